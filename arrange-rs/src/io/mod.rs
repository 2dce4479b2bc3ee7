/// External (serializable) representations of arrangement instances and solutions.
pub mod ext_repr;

/// All logic for converting external representations into arrangement inputs
pub mod import;

/// All logic for exporting arrangement results into external representations
pub mod export;

/// All logic for drawing arrangements as SVG
pub mod svg;
