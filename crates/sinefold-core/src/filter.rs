//! Filter response types and the cutoff clamps shared by all filters.

/// Response of a [`Biquad`](crate::Biquad), [`OnePole`](crate::OnePole) or
/// [`Tilt`](crate::Tilt) filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Passes frequencies below the cutoff.
    #[default]
    Lowpass,
    /// Passes frequencies above the cutoff.
    Highpass,
    /// Boosts or cuts frequencies below the cutoff.
    LowShelf,
    /// Boosts or cuts frequencies above the cutoff.
    HighShelf,
}

impl FilterType {
    /// All types in cycling order.
    pub const ALL: [FilterType; 4] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::LowShelf,
        FilterType::HighShelf,
    ];

    /// The next type in the LP → HP → LS → HS → LP cycle.
    pub fn next(self) -> Self {
        match self {
            FilterType::Lowpass => FilterType::Highpass,
            FilterType::Highpass => FilterType::LowShelf,
            FilterType::LowShelf => FilterType::HighShelf,
            FilterType::HighShelf => FilterType::Lowpass,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::LowShelf => "lowshelf",
            FilterType::HighShelf => "highshelf",
        }
    }
}

/// Resonance range accepted by second-order filters.
pub(crate) const RESONANCE_LIMIT: f32 = 0.999;

/// Largest shelf or tilt gain in dB, boost or cut.
pub const MAX_SHELF_DB: f32 = 50.0;

/// Clamp a shelf gain to `±MAX_SHELF_DB`.
#[inline]
pub(crate) fn clamp_shelf_db(db: f32) -> f32 {
    db.clamp(-MAX_SHELF_DB, MAX_SHELF_DB)
}

/// Clamp a cutoff for second-order filters: `[fs/24576, fs/2.125]`.
#[inline]
pub(crate) fn clamp_biquad_cutoff(cutoff: f32, sample_rate: f32) -> f32 {
    cutoff.clamp(sample_rate / 24576.0, sample_rate / 2.125)
}

/// Clamp a cutoff for first-order filters: `[fs/24000, fs/2.18]`.
#[inline]
pub(crate) fn clamp_one_pole_cutoff(cutoff: f32, sample_rate: f32) -> f32 {
    cutoff.clamp(sample_rate / 24000.0, sample_rate / 2.18)
}

/// Sanitize a sample rate; non-positive or non-finite rates fall back to 48 kHz.
///
/// ```rust
/// use sinefold_core::sanitize_sample_rate;
///
/// assert_eq!(sanitize_sample_rate(0.0), 48000.0);
/// assert_eq!(sanitize_sample_rate(96000.0), 96000.0);
/// ```
#[inline]
pub fn sanitize_sample_rate(sample_rate: f32) -> f32 {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate
    } else {
        48000.0
    }
}
