//! Structured element types stored in packed vector and color arrays.
//!
//! All components are `f32`, matching the engine's single-precision build.
//! Each type converts losslessly to and from a fixed-size component array,
//! which is also its wire representation.

use crate::ordering::lexicographic_less;

macro_rules! component_struct {
    ($(#[$meta:meta])* $name:ident, $n:literal, [$($field:ident),+]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(pub $field: f32,)+
        }

        impl $name {
            /// All components zero.
            pub const ZERO: Self = Self { $($field: 0.0,)+ };

            /// Create a value from its components.
            #[inline]
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field,)+ }
            }

            /// Components in declaration order.
            #[inline]
            pub const fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            /// Strict lexicographic order over the components.
            ///
            /// NaN components order above every other value so that sorting
            /// stays total.
            #[inline]
            pub fn less(&self, other: &Self) -> bool {
                lexicographic_less(&self.to_array(), &other.to_array())
            }
        }

        impl From<[f32; $n]> for $name {
            #[inline]
            fn from(c: [f32; $n]) -> Self {
                let [$($field),+] = c;
                Self { $($field,)+ }
            }
        }

        impl From<$name> for [f32; $n] {
            #[inline]
            fn from(v: $name) -> Self {
                v.to_array()
            }
        }
    };
}

component_struct!(
    /// 2D vector.
    Vector2, 2, [x, y]
);

component_struct!(
    /// 3D vector.
    Vector3, 3, [x, y, z]
);

component_struct!(
    /// 4D vector.
    Vector4, 4, [x, y, z, w]
);

component_struct!(
    /// RGBA color with linear `f32` channels.
    Color, 4, [r, g, b, a]
);

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector2_array_round_trip() {
        let v = Vector2::new(1.5, -2.0);
        let arr: [f32; 2] = v.into();
        assert_eq!(arr, [1.5, -2.0]);
        assert_eq!(Vector2::from(arr), v);
    }

    #[test]
    fn test_vector_less_is_lexicographic() {
        assert!(Vector2::new(1.0, 9.0).less(&Vector2::new(2.0, 0.0)));
        assert!(Vector2::new(1.0, 1.0).less(&Vector2::new(1.0, 2.0)));
        assert!(!Vector2::new(1.0, 2.0).less(&Vector2::new(1.0, 2.0)));
        assert!(Vector3::new(0.0, 0.0, 1.0).less(&Vector3::new(0.0, 0.0, 2.0)));
        assert!(Vector4::new(0.0, 1.0, 0.0, 0.0).less(&Vector4::new(0.0, 1.0, 0.0, 0.5)));
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::WHITE.to_array(), [1.0; 4]);
        assert_eq!(Color::rgb(0.0, 0.0, 0.0), Color::BLACK);
        assert!(Color::BLACK.less(&Color::WHITE));
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Vector3::ZERO, Vector3::default());
        assert_eq!(Color::ZERO, Color::default());
    }
}
