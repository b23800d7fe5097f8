//! Channel mixing utilities (stereo to mono conversion)

use crate::error::AudioError;

/// Convert stereo to mono in place
///
/// Each left sample is replaced by `(L + R) / 2`.
///
/// # Arguments
///
/// * `left` - Left channel samples, overwritten with the mono mix
/// * `right` - Right channel samples
///
/// # Errors
///
/// `InvalidInput` if the channels differ in length.
pub fn stereo_to_mono(left: &mut [f32], right: &[f32]) -> Result<(), AudioError> {
    if left.len() != right.len() {
        return Err(AudioError::InvalidInput(format!(
            "Stereo channels differ in length: {} vs {}",
            left.len(),
            right.len()
        )));
    }

    log::debug!("Downmixing {} stereo frames to mono", left.len());

    for (l, &r) in left.iter_mut().zip(right) {
        *l = (*l + r) / 2.0;
    }
    Ok(())
}
