use arrange_rs::io::svg::SvgDrawOptions;
use arrange_rs::util::ArrangeConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the FFP binary
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct FFPConfig {
    /// Forwarded to the arrangement, `accuracy` also sets the search budget of the placer
    #[serde(default)]
    pub arrange_config: ArrangeConfig,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}
