use std::any::Any;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid game config: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("audio unavailable: {0}")]
    Audio(String),
}

const GRAPHICS_DIAGNOSTIC: &str = "Neon Lander could not open a window or find a GPU adapter. \
    Install graphics drivers with Vulkan, Metal, DirectX 12 or OpenGL support \
    and make sure a display is available.";

// Fragments of the panics raised by the renderer and windowing backends.
const GRAPHICS_FAILURES: [&str; 5] = ["GPU", "adapter", "wgpu", "event loop", "display"];

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

pub fn is_graphics_failure(message: &str) -> bool {
    GRAPHICS_FAILURES
        .iter()
        .any(|fragment| message.contains(fragment))
}

/// Chains onto the default panic hook and adds an install hint when the
/// renderer or window could not be created.
pub fn install_graphics_diagnostic() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        if panic_message(info.payload()).is_some_and(is_graphics_failure) {
            eprintln!("{GRAPHICS_DIAGNOSTIC}");
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_panics_are_recognized() {
        assert!(is_graphics_failure(
            "Unable to find a GPU! Make sure you have installed required drivers!"
        ));
        assert!(is_graphics_failure("Failed to build event loop: NotSupported"));
        assert!(!is_graphics_failure("index out of bounds"));
    }

    #[test]
    fn panic_payloads_are_read_as_text() {
        let borrowed: Box<dyn Any + Send> = Box::new("static message");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        let other: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(borrowed.as_ref()), Some("static message"));
        assert_eq!(panic_message(owned.as_ref()), Some("owned message"));
        assert_eq!(panic_message(other.as_ref()), None);
    }

    #[test]
    fn config_errors_carry_context() {
        let err = ron::de::from_str::<u32>("\"x\"").unwrap_err();
        let message = GameError::from(err).to_string();
        assert!(message.starts_with("invalid game config:"));
    }
}
