/// Configuration for the GPUI scope view.
#[derive(Debug, Clone)]
pub struct ScopeViewConfig {
    /// Padding fraction applied when auto-fitting data.
    pub padding_frac: f64,
    /// Minimum padding applied when auto-fitting data.
    pub min_padding: f64,
    /// Pixels reserved left of the plot for Y tick labels.
    pub margin_left: f32,
    /// Pixels reserved below the plot for X tick labels.
    pub margin_bottom: f32,
    /// Pixels reserved on the remaining sides.
    pub margin: f32,
    /// Tick labels per axis.
    pub ticks_per_axis: usize,
    /// Offset of the cursor readout from the pointer, in pixels.
    pub readout_offset_px: f32,
}

impl Default for ScopeViewConfig {
    fn default() -> Self {
        Self {
            padding_frac: 0.05,
            min_padding: 1e-6,
            margin_left: 52.0,
            margin_bottom: 30.0,
            margin: 12.0,
            ticks_per_axis: 5,
            readout_offset_px: 14.0,
        }
    }
}
