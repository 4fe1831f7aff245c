//! One-shot hardware peripheral initialization.
//!
//! Configures the lights GPIO and the LEDC timers/channels for the four
//! pulse outputs using raw ESP-IDF sys calls. Called once from `main()`
//! before the stream server starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc)  => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcTimerFailed(rc)   => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── LEDC channel map ──────────────────────────────────────────

pub const LEDC_CH_LIFT: u32 = 0;
pub const LEDC_CH_WINCH: u32 = 1;
pub const LEDC_CH_DRIVE_A: u32 = 2;
pub const LEDC_CH_DRIVE_B: u32 = 3;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(pwm_frequency_hz: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the stream server starts;
    // single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_ledc(pwm_frequency_hz)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(pwm_frequency_hz: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped ({} Hz PWM)", pwm_frequency_hz);
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LIGHTS_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pins::LIGHTS_GPIO, 0) };

    info!("hw_init: lights GPIO{} configured (push-pull)", pins::LIGHTS_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Frame-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(freq_hz: u32) -> Result<(), HwInitError> {
    for timer in [pins::LEDC_TIMER_A, pins::LEDC_TIMER_B] {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: timer,
            duty_resolution: pins::PWM_RESOLUTION_BITS,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = unsafe { ledc_timer_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcTimerFailed(ret)); }
    }

    // Output pairing mirrors the wiring harness: lift + drive B share one
    // timer, winch + drive A the other.
    let channels = [
        (LEDC_CH_LIFT,    pins::LEDC_TIMER_A, pins::LIFT_PWM_GPIO),
        (LEDC_CH_DRIVE_B, pins::LEDC_TIMER_A, pins::DRIVE_B_PWM_GPIO),
        (LEDC_CH_WINCH,   pins::LEDC_TIMER_B, pins::WINCH_PWM_GPIO),
        (LEDC_CH_DRIVE_A, pins::LEDC_TIMER_B, pins::DRIVE_A_PWM_GPIO),
    ];
    for (channel, timer, gpio) in channels {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: timer,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcChannelFailed(ret)); }
    }

    info!(
        "hw_init: LEDC configured at {} Hz (lift=CH0, winch=CH1, drive_a=CH2, drive_b=CH3)",
        freq_hz
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the frame loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}
