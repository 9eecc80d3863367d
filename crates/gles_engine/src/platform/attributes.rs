//! EGL attribute lists built from [`EglConfig`]

use crate::config::EglConfig;
use khronos_egl as egl;

/// Attributes for `eglChooseConfig`: an RGB window surface renderable by
/// OpenGL ES 2, `EGL_NONE` terminated.
#[rustfmt::skip]
pub fn config_attributes(config: &EglConfig) -> Vec<egl::Int> {
    vec![
        egl::RED_SIZE, config.red_size,
        egl::GREEN_SIZE, config.green_size,
        egl::BLUE_SIZE, config.blue_size,
        egl::DEPTH_SIZE, config.depth_size,
        egl::SURFACE_TYPE, egl::WINDOW_BIT,
        egl::RENDERABLE_TYPE, egl::OPENGL_ES2_BIT,
        egl::NONE,
    ]
}

/// Attributes for `eglCreateContext`, `EGL_NONE` terminated.
pub fn context_attributes(config: &EglConfig) -> Vec<egl::Int> {
    vec![egl::CONTEXT_CLIENT_VERSION, config.client_version, egl::NONE]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(list: &[egl::Int], key: egl::Int) -> Option<egl::Int> {
        list.chunks(2)
            .find(|pair| pair[0] == key)
            .and_then(|pair| pair.get(1).copied())
    }

    #[test]
    fn test_config_attributes_defaults() {
        let attrs = config_attributes(&EglConfig::default());
        assert_eq!(attrs.last(), Some(&egl::NONE));
        assert_eq!(attrs.len() % 2, 1);
        assert_eq!(value_of(&attrs, egl::RED_SIZE), Some(8));
        assert_eq!(value_of(&attrs, egl::GREEN_SIZE), Some(8));
        assert_eq!(value_of(&attrs, egl::BLUE_SIZE), Some(8));
        assert_eq!(value_of(&attrs, egl::DEPTH_SIZE), Some(16));
        assert_eq!(value_of(&attrs, egl::SURFACE_TYPE), Some(egl::WINDOW_BIT));
        assert_eq!(value_of(&attrs, egl::RENDERABLE_TYPE), Some(egl::OPENGL_ES2_BIT));
    }

    #[test]
    fn test_context_attributes_follow_config() {
        let config = EglConfig { client_version: 3, ..EglConfig::default() };
        let attrs = context_attributes(&config);
        assert_eq!(attrs, vec![egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE]);
    }
}
