#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use float_cmp::approx_eq;
    use test_case::test_case;

    use arrange_rs::arrange::{
        Alignment, ArrangeScorer, Arranger, ItemCase, Objective, PackGroup, PlacedSnapshot,
        PlacementConfig, PlacementObjective, PlacementSolver, ProgressFn, Score, ScoringContext,
        StopFn, arrange, arrange_movable, big_item_score, fixed_overfit, last_big_item_score,
        small_item_score, stride_padding,
    };
    use arrange_rs::entities::{Bed, BedShapeHint, PlacementItem};
    use arrange_rs::geometry::overfit::hull_circle_overfit;
    use arrange_rs::geometry::primitives::{Circle, Point, Rect, SPolygon};
    use arrange_rs::io::import::ArrangeObject;
    use arrange_rs::util::ArrangeConfig;

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    fn rect(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Rect {
        Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Rectangular item of `w` x `h`, with its bottom left corner at `(x, y)`
    fn rect_item(id: usize, x: f64, y: f64, w: f64, h: f64) -> PlacementItem {
        let shape = SPolygon::from(rect(0.0, 0.0, w, h));
        PlacementItem::new(id, shape, Point(x, y), 0.0)
    }

    fn box_bed(side: f64) -> Bed {
        Bed::Box(rect(0.0, 0.0, side, side))
    }

    /// Synchronizes `ctx` as if `placed` were placed and `n_remaining` items were still to come
    fn sync(ctx: &mut ScoringContext, placed: &[PlacementItem], remaining: &[PlacementItem]) {
        let pile = placed
            .iter()
            .map(|i| i.transformed_shape().clone())
            .collect::<Vec<_>>();
        let placed = placed.iter().collect::<Vec<_>>();
        let remaining = remaining.iter().collect::<Vec<_>>();
        ctx.begin_next_item(&pile, &placed, &remaining);
    }

    fn square_object(id: u64, side: f64) -> ArrangeObject {
        let contour = vec![
            Point(0.0, 0.0),
            Point(side, 0.0),
            Point(side, side),
            Point(0.0, side),
        ];
        ArrangeObject::new(id, contour, Point(0.0, 0.0), 0.0)
    }

    #[test_case(200.0, ItemCase::SmallItem; "exactly at threshold")]
    #[test_case(199.0, ItemCase::SmallItem; "below threshold")]
    #[test_case(201.0, ItemCase::BigItem; "above threshold")]
    fn big_item_threshold(area: f64, expected: ItemCase) {
        //bed area 10_000, threshold area 200
        let bed = box_bed(100.0);
        let mut ctx = ScoringContext::new(&bed);
        let big = rect_item(0, 0.0, 0.0, 20.0, 20.0);
        let rest = rect_item(1, 0.0, 0.0, 1.0, 1.0);
        sync(&mut ctx, &[big], &[rest]);
        assert_eq!(ctx.big_index().len(), 1);

        let candidate = rect_item(2, 50.0, 50.0, 10.0, area / 10.0);
        assert_eq!(ctx.classify(&candidate), expected);
    }

    #[test]
    fn classification_without_big_items() {
        let bed = box_bed(100.0);
        let mut ctx = ScoringContext::new(&bed);
        let small = rect_item(0, 0.0, 0.0, 5.0, 5.0);
        let candidate = rect_item(1, 20.0, 20.0, 5.0, 5.0);

        //nothing big on the bed yet: small items are scored as big ones
        sync(&mut ctx, &[small.clone()], &[rect_item(2, 0.0, 0.0, 5.0, 5.0)]);
        assert_eq!(ctx.classify(&candidate), ItemCase::BigItem);
        assert_eq!(ctx.all_index().len(), 1);
        assert!(ctx.big_index().is_empty());

        sync(&mut ctx, &[small], &[]);
        assert_eq!(ctx.classify(&candidate), ItemCase::LastBigItem);
    }

    #[test]
    fn objective_is_deterministic() {
        let bed = box_bed(100.0);
        let mut ctx = ScoringContext::new(&bed);
        let placed = vec![
            rect_item(0, 40.0, 40.0, 20.0, 20.0),
            rect_item(1, 60.0, 40.0, 20.0, 20.0),
            rect_item(2, 30.0, 30.0, 5.0, 5.0),
        ];
        let remaining = vec![rect_item(3, 0.0, 0.0, 20.0, 20.0)];
        sync(&mut ctx, &placed, &remaining);

        let objective = Objective::for_bed(&bed);
        for candidate in [
            rect_item(4, 40.0, 60.0, 20.0, 20.0),
            rect_item(5, 10.0, 10.0, 3.0, 3.0),
        ] {
            let first = objective.evaluate(&ctx, &candidate);
            for _ in 0..10 {
                assert_eq!(
                    objective.evaluate(&ctx, &candidate).to_bits(),
                    first.to_bits()
                );
            }
        }
    }

    #[test]
    fn big_item_score_without_neighbours() {
        let item_bbox = rect(0.0, 0.0, 10.0, 10.0);
        let no_neighbours = Vec::<PlacedSnapshot>::new();
        let cost = big_item_score(
            item_bbox,
            100.0,
            item_bbox,
            Point(50.0, 50.0),
            100.0,
            no_neighbours,
        );

        //the center anchor coincides with the pile center
        let dist_bed = 45.0 * 2.0_f64.sqrt() / 100.0;
        let dist = 0.2 * dist_bed;
        let density = 0.1;
        assert!(approx_eq!(f64, cost, 0.5 * dist + 0.5 * density, epsilon = 1e-12));
    }

    #[test]
    fn big_item_score_alignment() {
        let item_bbox = rect(0.0, 0.0, 10.0, 10.0);
        let full_bbox = rect(0.0, 0.0, 20.0, 10.0);
        let bed_center = Point(10.0, 5.0);

        //closest anchors are the right hand corners and the center, 5 away from the pile center
        let dist_pile = 5.0 / 100.0;
        let dist_bed = 5.0 / 100.0;
        let dist = 0.8 * dist_pile + 0.2 * dist_bed;
        let density = (0.2_f64 * 0.1).sqrt();

        //equally sized, flush neighbour: perfect alignment
        let aligned = PlacedSnapshot {
            bbox: rect(10.0, 0.0, 20.0, 10.0),
            area: 100.0,
        };
        let cost = big_item_score(item_bbox, 100.0, full_bbox, bed_center, 100.0, [aligned]);
        assert!(approx_eq!(f64, cost, 0.4 * dist + 0.4 * density, epsilon = 1e-12));

        //a neighbour of a different size gives no alignment bonus
        let other = PlacedSnapshot {
            bbox: rect(10.0, 0.0, 20.0, 10.0),
            area: 50.0,
        };
        let cost = big_item_score(item_bbox, 100.0, full_bbox, bed_center, 100.0, [other]);
        assert!(approx_eq!(
            f64,
            cost,
            0.4 * dist + 0.4 * density + 0.2,
            epsilon = 1e-12
        ));
    }

    #[test]
    fn last_big_and_small_item_scores() {
        let hull = [
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
        ];
        let cost = last_big_item_score(&hull, rect(0.0, 0.0, 10.0, 10.0), 100.0);
        assert!(approx_eq!(f64, cost, 0.4, ulps = 4));

        let cost = small_item_score(rect(8.0, -2.0, 12.0, 2.0), rect(-1.0, -1.0, 1.0, 1.0), 100.0);
        assert!(approx_eq!(f64, cost, 0.1, ulps = 4));
    }

    #[test]
    fn small_item_gravitates_to_big_items() {
        let bed = box_bed(100.0);
        let mut ctx = ScoringContext::new(&bed);
        let big = rect_item(0, 40.0, 40.0, 20.0, 20.0);
        sync(&mut ctx, &[big], &[rect_item(1, 0.0, 0.0, 2.0, 2.0)]);

        let near = rect_item(2, 60.0, 49.0, 2.0, 2.0);
        let far = rect_item(3, 90.0, 49.0, 2.0, 2.0);
        let center = bed.center();
        assert_eq!(ctx.classify(&near), ItemCase::SmallItem);
        assert!(ctx.score(&near, center).cost < ctx.score(&far, center).cost);
    }

    #[test]
    fn box_adapter_penalizes_overfit() {
        let bed = box_bed(100.0);
        let mut ctx = ScoringContext::new(&bed);
        let placed = rect_item(0, 0.0, 0.0, 100.0, 50.0);
        sync(&mut ctx, &[placed], &[rect_item(1, 0.0, 0.0, 1.0, 1.0)]);

        //pile grows to 120 x 50: overfit 20
        let candidate = rect_item(2, 100.0, 0.0, 20.0, 20.0);
        let Score { cost, full_bbox } = ctx.score(&candidate, bed.center());
        assert_eq!(full_bbox, rect(0.0, 0.0, 120.0, 50.0));

        let evaluated = Objective::for_bed(&bed).evaluate(&ctx, &candidate);
        assert!(approx_eq!(f64, evaluated, cost + 400.0, ulps = 4));
        assert_eq!(Objective::Irregular { center: bed.center() }.evaluate(&ctx, &candidate), cost);
    }

    #[test]
    fn circle_adapter_penalizes_big_items_only() {
        //bed area ~7854, threshold area ~157
        let circle = Circle::new(Point(50.0, 50.0), 50.0);
        let bed = Bed::Circle(circle);
        let mut ctx = ScoringContext::new(&bed);
        let placed = rect_item(0, 40.0, 40.0, 20.0, 20.0);
        sync(&mut ctx, &[placed], &[rect_item(1, 0.0, 0.0, 1.0, 1.0)]);
        let objective = Objective::for_bed(&bed);
        assert_eq!(objective, Objective::Circle { bin: circle });

        //hull corner (105, 40) sticks out of the bed
        let big = rect_item(2, 85.0, 40.0, 20.0, 20.0);
        assert_eq!(ctx.classify(&big), ItemCase::BigItem);
        let overfit = 3125.0_f64.sqrt() - 50.0;
        let cost = ctx.score(&big, circle.center).cost;
        let evaluated = objective.evaluate(&ctx, &big);
        assert!(approx_eq!(f64, evaluated, cost + overfit * overfit, epsilon = 1e-9));

        //a small item sticking out in the same spot is left unpenalized
        let small = rect_item(3, 95.0, 45.0, 10.0, 10.0);
        assert_eq!(ctx.classify(&small), ItemCase::SmallItem);
        assert!(hull_circle_overfit(&ctx.hull_with(&small), &circle) > 0.0);
        let cost = ctx.score(&small, circle.center).cost;
        assert_eq!(objective.evaluate(&ctx, &small), cost);
    }

    #[test]
    fn last_big_item_scored_by_hull_perimeter() {
        let bed = box_bed(100.0);
        let mut ctx = ScoringContext::new(&bed);
        sync(&mut ctx, &[rect_item(0, 0.0, 0.0, 10.0, 10.0)], &[]);

        let candidate = rect_item(1, 20.0, 20.0, 10.0, 10.0);
        assert_eq!(ctx.classify(&candidate), ItemCase::LastBigItem);

        //hull (0,0) (10,0) (30,20) (30,30) (20,30) (0,10), bounding box 30 x 30
        let hull_perimeter = 40.0 + 2.0 * 800.0_f64.sqrt();
        let expected = 0.5 * hull_perimeter / 100.0 + 0.5 * 120.0 / 100.0;

        let Score { cost, full_bbox } = ctx.score(&candidate, bed.center());
        assert_eq!(full_bbox, rect(0.0, 0.0, 30.0, 30.0));
        assert!(approx_eq!(f64, cost, expected, epsilon = 1e-12));
        //the pile fits the bed, no penalty on top
        let evaluated = Objective::for_bed(&bed).evaluate(&ctx, &candidate);
        assert!(approx_eq!(f64, evaluated, expected, epsilon = 1e-12));
    }

    #[test]
    fn fixed_overfit_penalty() {
        let bin_bbox = rect(0.0, 0.0, 100.0, 100.0);
        let inside = Score {
            cost: 1.0,
            full_bbox: rect(10.0, 10.0, 20.0, 20.0),
        };
        let outside = Score {
            cost: 1.0,
            full_bbox: rect(-10.0, 0.0, 50.0, 50.0),
        };
        assert_eq!(fixed_overfit(inside, &bin_bbox), 1.0);
        assert!(approx_eq!(f64, fixed_overfit(outside, &bin_bbox), 1001.0));
    }

    #[test]
    fn is_colliding_queries() {
        init_logger();
        let bed = box_bed(100.0);
        let mut arranger =
            Arranger::<RecordingSolver>::new(bed, 0.0, &ArrangeConfig::default(), None, None);
        let query = rect_item(0, 10.0, 10.0, 10.0, 10.0);
        assert!(!arranger.is_colliding(&query));

        let mut fixed = vec![rect_item(1, 0.0, 0.0, 15.0, 15.0)];
        arranger.preload(&mut fixed);
        assert!(fixed[0].is_fixed());
        assert_eq!(arranger.config().alignment, Alignment::DontAlign);
        assert!(matches!(
            arranger.scorer().objective,
            Objective::FixedOverfit { .. }
        ));

        //overlapping
        assert!(arranger.is_colliding(&query));
        //disjoint
        assert!(!arranger.is_colliding(&rect_item(2, 50.0, 50.0, 10.0, 10.0)));
        //touching
        assert!(arranger.is_colliding(&rect_item(3, 15.0, 0.0, 10.0, 10.0)));
    }

    /// What the last [`RecordingSolver`] on this thread was asked to do
    #[derive(Clone, Debug, Default)]
    struct RunRecord {
        n_fixed: usize,
        n_movable: usize,
        config: Option<PlacementConfig>,
    }

    thread_local! {
        static LAST_RUN: RefCell<RunRecord> = RefCell::new(RunRecord::default());
    }

    /// Puts every movable item on a bed of its own, centered.
    /// Fixed items stay where they are on the first bed.
    struct RecordingSolver {
        bed: Bed,
        config: PlacementConfig,
        progress: Option<ProgressFn>,
        stop: Option<StopFn>,
    }

    impl PlacementSolver for RecordingSolver {
        fn new(bed: Bed, _min_distance: f64) -> Self {
            Self {
                bed,
                config: PlacementConfig::default(),
                progress: None,
                stop: None,
            }
        }

        fn configure(&mut self, config: PlacementConfig) {
            self.config = config;
        }

        fn progress_indicator(&mut self, progress: ProgressFn) {
            self.progress = Some(progress);
        }

        fn stop_condition(&mut self, stop: StopFn) {
            self.stop = Some(stop);
        }

        fn execute(
            &mut self,
            items: &mut [PlacementItem],
            objective: &mut dyn PlacementObjective,
        ) -> PackGroup {
            let (fixed, movable): (Vec<usize>, Vec<usize>) =
                (0..items.len()).partition(|&i| items[i].is_fixed());
            LAST_RUN.with(|r| {
                *r.borrow_mut() = RunRecord {
                    n_fixed: fixed.len(),
                    n_movable: movable.len(),
                    config: Some(self.config.clone()),
                }
            });

            let mut pack_group = vec![fixed];
            for (n, &i) in movable.iter().enumerate() {
                if self.stop.as_ref().is_some_and(|stop| stop()) {
                    break;
                }
                objective.begin_next_item(&[], &[], &[]);
                let d = self.bed.center() - items[i].bbox().centroid();
                items[i].translate(d);
                assert!(objective.evaluate(&items[i]).is_finite());
                match pack_group[0].is_empty() {
                    true => pack_group[0].push(i),
                    false => pack_group.push(vec![i]),
                }
                if let Some(progress) = &self.progress {
                    progress(movable.len() - n - 1);
                }
            }
            pack_group
        }
    }

    #[test_case(3; "three beds")]
    #[test_case(5; "five beds")]
    fn stride_between_beds(n: usize) {
        init_logger();
        let width = 250.0;
        let hint = BedShapeHint::Box(rect(0.0, 0.0, width, 210.0));
        let mut objects = (0..n as u64).map(|id| square_object(id, 10.0)).collect::<Vec<_>>();

        let n_progress = Arc::new(AtomicUsize::new(0));
        let progress: ProgressFn = {
            let n_progress = n_progress.clone();
            Arc::new(move |_: usize| {
                n_progress.fetch_add(1, Ordering::SeqCst);
            })
        };

        let success =
            arrange_movable::<RecordingSolver, _>(&mut objects, 0.0, &hint, Some(progress), None)
                .unwrap();
        assert!(success);
        assert_eq!(n_progress.load(Ordering::SeqCst), n);

        let (first, _) = objects[0].result.unwrap();
        for (k, obj) in objects.iter().enumerate() {
            let (offset, rotation) = obj.result.unwrap();
            assert_eq!(rotation, 0.0);
            assert!(approx_eq!(
                f64,
                offset.0 - first.0,
                k as f64 * stride_padding(width),
                ulps = 4
            ));
            assert_eq!(offset.1, first.1);
        }
        assert_eq!(stride_padding(width), 300.0);
    }

    #[test]
    fn stop_reports_failure() {
        init_logger();
        let hint = BedShapeHint::Box(rect(0.0, 0.0, 100.0, 100.0));
        let mut objects = (0..3).map(|id| square_object(id, 10.0)).collect::<Vec<_>>();
        let stop: StopFn = Arc::new(|| true);

        let success =
            arrange_movable::<RecordingSolver, _>(&mut objects, 0.0, &hint, None, Some(stop))
                .unwrap();
        assert!(!success);
        assert!(objects.iter().all(|o| o.result.is_none()));
    }

    #[test]
    fn fixed_items_outside_bed_are_discarded() {
        init_logger();
        let hint = BedShapeHint::Box(rect(0.0, 0.0, 100.0, 100.0));
        let mut movable = vec![square_object(0, 10.0)];
        let mut inside = square_object(1, 10.0);
        inside.offset = Point(0.0, 0.0);
        let mut outside = square_object(2, 10.0);
        outside.offset = Point(150.0, 0.0);
        let mut crossing = square_object(3, 10.0);
        crossing.offset = Point(95.0, 50.0);

        let fixed = vec![inside, outside, crossing];
        let success =
            arrange::<RecordingSolver, _, _>(&mut movable, &fixed, 0.0, &hint, None, None).unwrap();
        assert!(success);

        let record = LAST_RUN.with(|r| r.borrow().clone());
        //the remaining fixed item and the seeded movable item
        assert_eq!(record.n_fixed, 2);
        assert_eq!(record.n_movable, 0);
        assert_eq!(
            record.config.map(|c| c.alignment),
            Some(Alignment::DontAlign)
        );
        assert!(fixed.iter().all(|f| f.result.is_none()));
    }

    #[test]
    fn first_item_is_seeded_in_the_center() {
        init_logger();
        let hint = BedShapeHint::Box(rect(0.0, 0.0, 100.0, 100.0));
        let fixed = vec![square_object(10, 10.0)];
        let mut movable = vec![square_object(0, 20.0), square_object(1, 20.0)];

        let success =
            arrange::<RecordingSolver, _, _>(&mut movable, &fixed, 0.0, &hint, None, None).unwrap();
        assert!(success);

        let (offset, _) = movable[0].result.unwrap();
        assert_eq!(offset, Point(40.0, 40.0));
        let record = LAST_RUN.with(|r| r.borrow().clone());
        assert_eq!(record.n_fixed, 2);
        assert_eq!(record.n_movable, 1);
        assert!(movable[1].result.is_some());
    }

    #[test]
    fn no_seed_when_center_is_occupied() {
        init_logger();
        let hint = BedShapeHint::Box(rect(0.0, 0.0, 100.0, 100.0));
        let mut obstacle = square_object(10, 10.0);
        obstacle.offset = Point(45.0, 45.0);
        let mut movable = vec![square_object(0, 20.0)];

        arrange::<RecordingSolver, _, _>(&mut movable, &[obstacle], 0.0, &hint, None, None)
            .unwrap();
        let record = LAST_RUN.with(|r| r.borrow().clone());
        assert_eq!(record.n_fixed, 1);
        assert_eq!(record.n_movable, 1);
    }

    #[test]
    fn invalid_contour_is_an_error() {
        let hint = BedShapeHint::Box(rect(0.0, 0.0, 100.0, 100.0));
        let mut movable = vec![ArrangeObject::new(
            0,
            vec![Point(0.0, 0.0), Point(1.0, 1.0)],
            Point(0.0, 0.0),
            0.0,
        )];
        assert!(arrange_movable::<RecordingSolver, _>(&mut movable, 0.0, &hint, None, None).is_err());
    }

    #[test]
    fn scorer_delegates_to_context() {
        let bed = box_bed(100.0);
        let mut scorer = ArrangeScorer {
            ctx: ScoringContext::new(&bed),
            objective: Objective::for_bed(&bed),
        };
        let placed = rect_item(0, 40.0, 40.0, 20.0, 20.0);
        let pile = vec![placed.transformed_shape().clone()];
        scorer.begin_next_item(&pile, &[&placed], &[]);
        assert_eq!(scorer.ctx.pile_bbox(), Some(rect(40.0, 40.0, 60.0, 60.0)));
        assert_eq!(scorer.ctx.n_remaining(), 0);

        let candidate = rect_item(1, 60.0, 40.0, 20.0, 20.0);
        assert_eq!(
            scorer.evaluate(&candidate),
            scorer.objective.evaluate(&scorer.ctx, &candidate)
        );
    }
}
