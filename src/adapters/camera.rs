//! Camera adapter: implements [`CameraPort`].
//!
//! - **`target_os = "espidf"`**: the esp32-camera driver. Raw RGB565
//!   frames are compressed with `frame2jpg` at the configured quality;
//!   sensors already in JPEG mode hand their buffer straight through.
//! - **all other targets**: [`SimCamera`], a synthetic JPEG source with an
//!   optional injected failure for tests.

use crate::app::ports::CameraPort;
use crate::error::CameraError;

#[cfg(target_os = "espidf")]
pub use device::{EspCamera, JpegFrame};

#[cfg(target_os = "espidf")]
mod device {
    use core::ffi::c_void;
    use core::ptr;

    use esp_idf_svc::sys::camera::{
        camera_config_t, camera_fb_t, esp_camera_deinit, esp_camera_fb_get, esp_camera_fb_return,
        esp_camera_init, frame2jpg,
    };
    use esp_idf_svc::sys::camera::{
        camera_fb_location_t_CAMERA_FB_IN_PSRAM, camera_grab_mode_t_CAMERA_GRAB_LATEST,
        framesize_t_FRAMESIZE_QQVGA, framesize_t_FRAMESIZE_QVGA, framesize_t_FRAMESIZE_VGA,
        pixformat_t_PIXFORMAT_JPEG, pixformat_t_PIXFORMAT_RGB565,
    };
    use esp_idf_svc::sys::{ESP_OK, free};
    use log::info;

    use super::{CameraError, CameraPort};
    use crate::config::{FrameSize, PixelFormat, SystemConfig};
    use crate::pins;

    /// One encoded frame. Returns its buffer to the driver (or the heap)
    /// on drop.
    pub struct JpegFrame {
        buf: *const u8,
        len: usize,
        /// Driver frame buffer still held, or null when `buf` came from
        /// `frame2jpg` and must be freed.
        fb: *mut camera_fb_t,
    }

    impl AsRef<[u8]> for JpegFrame {
        fn as_ref(&self) -> &[u8] {
            // SAFETY: buf/len describe a live allocation owned by self.
            unsafe { core::slice::from_raw_parts(self.buf, self.len) }
        }
    }

    impl Drop for JpegFrame {
        fn drop(&mut self) {
            // SAFETY: exactly one of the two owners is live.
            unsafe {
                if self.fb.is_null() {
                    free(self.buf as *mut c_void);
                } else {
                    esp_camera_fb_return(self.fb);
                }
            }
        }
    }

    pub struct EspCamera {
        quality: u8,
        passthrough: bool,
    }

    impl EspCamera {
        /// Reset and configure the sensor. Blocks for the sensor's settle
        /// time inside the driver.
        pub fn init(config: &SystemConfig) -> Result<Self, CameraError> {
            // SAFETY: camera_config_t is plain C data; every field the
            // driver reads is assigned below.
            let mut cfg: camera_config_t = unsafe { core::mem::zeroed() };
            cfg.pin_pwdn = pins::CAM_PWDN_GPIO;
            cfg.pin_reset = pins::CAM_RESET_GPIO;
            cfg.pin_xclk = pins::CAM_XCLK_GPIO;
            cfg.__bindgen_anon_1.pin_sccb_sda = pins::CAM_SIOD_GPIO;
            cfg.__bindgen_anon_2.pin_sccb_scl = pins::CAM_SIOC_GPIO;
            cfg.pin_d7 = pins::CAM_Y9_GPIO;
            cfg.pin_d6 = pins::CAM_Y8_GPIO;
            cfg.pin_d5 = pins::CAM_Y7_GPIO;
            cfg.pin_d4 = pins::CAM_Y6_GPIO;
            cfg.pin_d3 = pins::CAM_Y5_GPIO;
            cfg.pin_d2 = pins::CAM_Y4_GPIO;
            cfg.pin_d1 = pins::CAM_Y3_GPIO;
            cfg.pin_d0 = pins::CAM_Y2_GPIO;
            cfg.pin_vsync = pins::CAM_VSYNC_GPIO;
            cfg.pin_href = pins::CAM_HREF_GPIO;
            cfg.pin_pclk = pins::CAM_PCLK_GPIO;
            cfg.xclk_freq_hz = pins::CAM_XCLK_FREQ_HZ;
            cfg.ledc_timer = pins::CAMERA_LEDC_TIMER as _;
            cfg.ledc_channel = pins::CAMERA_LEDC_CHANNEL as _;
            cfg.pixel_format = match config.pixel_format {
                PixelFormat::Rgb565 => pixformat_t_PIXFORMAT_RGB565,
                PixelFormat::Jpeg => pixformat_t_PIXFORMAT_JPEG,
            };
            cfg.frame_size = match config.frame_size {
                FrameSize::Qqvga => framesize_t_FRAMESIZE_QQVGA,
                FrameSize::Qvga => framesize_t_FRAMESIZE_QVGA,
                FrameSize::Vga => framesize_t_FRAMESIZE_VGA,
            };
            // Sensor-side quality scale is inverted (lower = better).
            cfg.jpeg_quality = 12;
            cfg.fb_count = 2;
            cfg.fb_location = camera_fb_location_t_CAMERA_FB_IN_PSRAM;
            cfg.grab_mode = camera_grab_mode_t_CAMERA_GRAB_LATEST;

            let ret = unsafe { esp_camera_init(&cfg) };
            if ret != ESP_OK as i32 {
                return Err(CameraError::InitFailed(ret));
            }
            info!(
                "Camera: {:?} {:?}, JPEG quality {}",
                config.pixel_format, config.frame_size, config.jpeg_quality
            );
            Ok(Self {
                quality: config.jpeg_quality,
                passthrough: config.pixel_format == PixelFormat::Jpeg,
            })
        }
    }

    impl Drop for EspCamera {
        fn drop(&mut self) {
            unsafe { esp_camera_deinit() };
        }
    }

    impl CameraPort for EspCamera {
        type Frame = JpegFrame;

        fn capture(&mut self) -> Result<JpegFrame, CameraError> {
            // SAFETY: the driver is initialised for the lifetime of self;
            // every fb taken here is returned exactly once.
            unsafe {
                let fb = esp_camera_fb_get();
                if fb.is_null() {
                    return Err(CameraError::CaptureFailed);
                }

                if self.passthrough {
                    let buf = ptr::addr_of!((*fb).buf).read_unaligned();
                    let len = ptr::addr_of!((*fb).len).read_unaligned();
                    return Ok(JpegFrame { buf, len, fb });
                }

                let mut out: *mut u8 = ptr::null_mut();
                let mut out_len: usize = 0;
                let ok = frame2jpg(fb, self.quality, &mut out, &mut out_len);
                esp_camera_fb_return(fb);
                if !ok || out.is_null() {
                    return Err(CameraError::EncodeFailed);
                }
                Ok(JpegFrame {
                    buf: out,
                    len: out_len,
                    fb: ptr::null_mut(),
                })
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation
// ───────────────────────────────────────────────────────────────

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Synthetic frame source. Each frame is a minimal JPEG envelope
/// carrying the big-endian frame counter.
pub struct SimCamera {
    captured: u32,
    fail_after: Option<u32>,
}

impl SimCamera {
    pub fn new() -> Self {
        Self {
            captured: 0,
            fail_after: None,
        }
    }

    /// Captures succeed `frames` times, then fail.
    pub fn failing_after(frames: u32) -> Self {
        Self {
            captured: 0,
            fail_after: Some(frames),
        }
    }

    pub fn captured(&self) -> u32 {
        self.captured
    }
}

impl Default for SimCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraPort for SimCamera {
    type Frame = std::vec::Vec<u8>;

    fn capture(&mut self) -> Result<Self::Frame, CameraError> {
        if self.fail_after.is_some_and(|n| self.captured >= n) {
            return Err(CameraError::CaptureFailed);
        }
        self.captured += 1;
        let mut frame = std::vec::Vec::with_capacity(8);
        frame.extend_from_slice(&JPEG_SOI);
        frame.extend_from_slice(&self.captured.to_be_bytes());
        frame.extend_from_slice(&JPEG_EOI);
        Ok(frame)
    }
}
