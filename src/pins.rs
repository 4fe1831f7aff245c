//! GPIO / peripheral pin assignments for the rover carrier board.
//!
//! Single source of truth. Every driver references this module rather than
//! hard-coding pin numbers. Camera pins follow the OV2640 sensor board
//! (XIAO ESP32S3 Sense layout).

// ---------------------------------------------------------------------------
// PWM outputs (LEDC)
// ---------------------------------------------------------------------------

/// Wheel lift servo.
pub const LIFT_PWM_GPIO: i32 = 3;
/// Winch motor ESC.
pub const WINCH_PWM_GPIO: i32 = 1;
/// Drive motor A ESC.
pub const DRIVE_A_PWM_GPIO: i32 = 2;
/// Drive motor B ESC.
pub const DRIVE_B_PWM_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Digital outputs
// ---------------------------------------------------------------------------

/// Headlight MOSFET gate, push-pull, active HIGH.
pub const LIGHTS_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC duty resolution (bits). 14 bits is the ceiling on ESP32-S3.
pub const PWM_RESOLUTION_BITS: u32 = 14;

// The camera's XCLK owns LEDC timer 3 / channel 7; the drive outputs use
// timers 0-1 and channels 0-3.

/// LEDC timer for lift + drive B.
pub const LEDC_TIMER_A: u32 = 0;
/// LEDC timer for winch + drive A.
pub const LEDC_TIMER_B: u32 = 1;
pub const CAMERA_LEDC_TIMER: u32 = 3;
pub const CAMERA_LEDC_CHANNEL: u32 = 7;

// ---------------------------------------------------------------------------
// Camera (DVP, OV2640)
// ---------------------------------------------------------------------------

pub const CAM_PWDN_GPIO: i32 = -1;
pub const CAM_RESET_GPIO: i32 = -1;
pub const CAM_XCLK_GPIO: i32 = 10;
pub const CAM_SIOD_GPIO: i32 = 40;
pub const CAM_SIOC_GPIO: i32 = 39;

pub const CAM_Y9_GPIO: i32 = 48;
pub const CAM_Y8_GPIO: i32 = 11;
pub const CAM_Y7_GPIO: i32 = 12;
pub const CAM_Y6_GPIO: i32 = 14;
pub const CAM_Y5_GPIO: i32 = 16;
pub const CAM_Y4_GPIO: i32 = 18;
pub const CAM_Y3_GPIO: i32 = 17;
pub const CAM_Y2_GPIO: i32 = 15;

pub const CAM_VSYNC_GPIO: i32 = 38;
pub const CAM_HREF_GPIO: i32 = 47;
pub const CAM_PCLK_GPIO: i32 = 13;

/// Sensor master clock.
pub const CAM_XCLK_FREQ_HZ: i32 = 20_000_000;
