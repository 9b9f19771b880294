//! Canonical tensor-image representation and boundary layout conversions.
//!
//! Hosts hand images across the crate boundary as NHWC u8 (0–255). Inside
//! the pipeline everything is a [`TensorImage`]: NCHW float32 in [0,1].
//! Every variant consumes and produces `TensorImage`; the external layout
//! exists only at the entry and exit of the driver.

use anyhow::{bail, Result};
use ndarray::{Array4, ArrayD, Axis, IxDyn};

/// A batch of images in NCHW layout, float32, value range [0,1].
#[derive(Debug, Clone)]
pub struct TensorImage {
    data: Array4<f32>,
}

impl TensorImage {
    pub fn new(data: Array4<f32>) -> Self {
        Self { data }
    }

    pub fn batch(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn channels(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[3]
    }

    /// `(batch, channels, height, width)`.
    pub fn dims(&self) -> (usize, usize, usize, usize) {
        let shape = self.data.shape();
        (shape[0], shape[1], shape[2], shape[3])
    }

    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    pub fn into_data(self) -> Array4<f32> {
        self.data
    }
}

/// Convert an external NHWC u8 image (3-D `HWC` or 4-D `NHWC`) into the
/// canonical representation.
///
/// Returns the tensor plus a flag recording whether the input was 3-D, so
/// [`into_nhwc`] can restore the original rank on the way out.
pub fn from_nhwc(image: &ArrayD<u8>) -> Result<(TensorImage, bool)> {
    let (view, squeeze) = match image.ndim() {
        3 => (image.view().insert_axis(Axis(0)), true),
        4 => (image.view(), false),
        n => bail!("expected 3 or 4 image dimensions (HWC or NHWC), got {n}"),
    };

    let shape = view.shape();
    let (n, h, w, c) = (shape[0], shape[1], shape[2], shape[3]);
    if n == 0 || h == 0 || w == 0 {
        bail!("image dimensions must be non-zero, got {n}x{h}x{w}x{c}");
    }
    if !(1..=4).contains(&c) {
        bail!("expected 1-4 channels in the trailing axis, got {c}");
    }

    let contiguous = view.as_standard_layout();
    let src = contiguous
        .as_slice()
        .expect("standard-layout array is contiguous");

    let mut nchw = Array4::<f32>::zeros((n, c, h, w));
    {
        let dst = nchw
            .as_slice_mut()
            .expect("freshly allocated array is contiguous");
        let hw = h * w;
        let chw = c * hw;
        for b in 0..n {
            for y in 0..h {
                for x in 0..w {
                    let src_idx = ((b * h + y) * w + x) * c;
                    let pixel_idx = y * w + x;
                    for ch in 0..c {
                        dst[b * chw + ch * hw + pixel_idx] = src[src_idx + ch] as f32 / 255.0;
                    }
                }
            }
        }
    }

    Ok((TensorImage::new(nchw), squeeze))
}

/// Convert back to the external NHWC u8 layout: ×255, round to nearest,
/// clamp. When `squeeze` is set (and the batch is 1) the leading batch axis
/// is dropped so a 3-D input comes back 3-D.
pub fn into_nhwc(image: TensorImage, squeeze: bool) -> ArrayD<u8> {
    let (n, c, h, w) = image.dims();
    let squeeze = squeeze && n == 1;
    let data = image.into_data();
    let contiguous = data.as_standard_layout();
    let src = contiguous
        .as_slice()
        .expect("standard-layout array is contiguous");

    let hw = h * w;
    let chw = c * hw;
    let mut out = vec![0u8; n * h * w * c];
    for b in 0..n {
        for y in 0..h {
            for x in 0..w {
                let pixel_idx = y * w + x;
                let dst_idx = ((b * h + y) * w + x) * c;
                for ch in 0..c {
                    let value = src[b * chw + ch * hw + pixel_idx];
                    out[dst_idx + ch] = (value * 255.0).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    let shape: Vec<usize> = if squeeze {
        vec![h, w, c]
    } else {
        vec![n, h, w, c]
    };
    ArrayD::from_shape_vec(IxDyn(&shape), out).expect("output length matches shape")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3, Array4 as A4};

    fn patterned_hwc(h: usize, w: usize, c: usize) -> ArrayD<u8> {
        Array3::from_shape_fn((h, w, c), |(y, x, ch)| ((y * 31 + x * 7 + ch * 3) % 256) as u8)
            .into_dyn()
    }

    #[test]
    fn test_from_nhwc_3d_is_squeezed() {
        let image = patterned_hwc(4, 6, 3);
        let (tensor, squeeze) = from_nhwc(&image).unwrap();
        assert!(squeeze);
        assert_eq!(tensor.dims(), (1, 3, 4, 6));
    }

    #[test]
    fn test_from_nhwc_4d_keeps_batch() {
        let image =
            A4::from_shape_fn((2, 4, 4, 3), |(b, y, x, c)| ((b + y + x + c) % 256) as u8)
                .into_dyn();
        let (tensor, squeeze) = from_nhwc(&image).unwrap();
        assert!(!squeeze);
        assert_eq!(tensor.dims(), (2, 3, 4, 4));
    }

    #[test]
    fn test_from_nhwc_rejects_wrong_rank() {
        let image = Array2::<u8>::zeros((4, 4)).into_dyn();
        let err = from_nhwc(&image).err().expect("should fail");
        assert!(err.to_string().contains("expected 3 or 4 image dimensions"));
    }

    #[test]
    fn test_from_nhwc_rejects_bad_channel_count() {
        let image = Array3::<u8>::zeros((4, 4, 7)).into_dyn();
        let err = from_nhwc(&image).err().expect("should fail");
        assert!(err.to_string().contains("1-4 channels"));
    }

    #[test]
    fn test_value_normalization() {
        let mut image = Array3::<u8>::zeros((1, 2, 1));
        image[[0, 0, 0]] = 0;
        image[[0, 1, 0]] = 255;
        let (tensor, _) = from_nhwc(&image.into_dyn()).unwrap();
        assert_eq!(tensor.data()[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor.data()[[0, 0, 0, 1]], 1.0);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let image = patterned_hwc(5, 7, 3);
        let (tensor, squeeze) = from_nhwc(&image).unwrap();
        let restored = into_nhwc(tensor, squeeze);
        assert_eq!(restored, image);
    }

    #[test]
    fn test_round_trip_batch_is_exact() {
        let image =
            A4::from_shape_fn((3, 2, 2, 4), |(b, y, x, c)| ((b * 50 + y * 9 + x * 5 + c) % 256) as u8)
                .into_dyn();
        let (tensor, squeeze) = from_nhwc(&image).unwrap();
        let restored = into_nhwc(tensor, squeeze);
        assert_eq!(restored, image);
    }

    #[test]
    fn test_denormalization_rounds_to_nearest() {
        // 127.5/255 lands exactly between 127 and 128; round-half-away gives 128.
        let mut data = A4::<f32>::zeros((1, 1, 1, 2));
        data[[0, 0, 0, 0]] = 0.5;
        data[[0, 0, 0, 1]] = 1.2; // out of range, must clamp
        let out = into_nhwc(TensorImage::new(data), true);
        assert_eq!(out[[0, 0, 0]], 128);
        assert_eq!(out[[0, 1, 0]], 255);
    }
}
