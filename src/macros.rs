//! Schema declaration macros.

/// Declare a group schema.
///
/// Each field is a tree node constructed with its own name followed by the
/// arguments in parentheses; fields without arguments are built from the
/// name alone.
///
/// ```
/// use paramtree::{param_group, Group, Limited, Param, Sequence};
///
/// param_group! {
///     /// A 2D point.
///     pub struct Point {
///         pub x: Param<f64> = (0.0),
///         pub y: Param<f64> = (0.0),
///     }
/// }
///
/// param_group! {
///     pub struct Canvas {
///         pub width: Limited<u32> = (640, 1, 8192),
///         pub origin: Group<Point>,
///         pub path: Sequence<Point>,
///     }
/// }
///
/// let canvas = Canvas::default();
/// assert_eq!(*canvas.width.get(), 640);
/// ```
///
/// Generates the struct with `Debug`, `Clone` and `Default`, the
/// [`Schema`](crate::Schema) child table in declaration order, and an
/// [`Element`](crate::Element) impl so the schema can be a sequence or
/// collection member.
#[macro_export]
macro_rules! param_group {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(= ( $($arg:expr),* $(,)? ))?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field: <$ty>::new(stringify!($field) $($(, $arg)*)?),
                    )*
                }
            }
        }

        impl $crate::Schema for $name {
            const CHILDREN: &'static [$crate::Child<Self>] = &[
                $(
                    {
                        fn get(group: &$name) -> &dyn $crate::Field {
                            &group.$field
                        }
                        fn get_mut(group: &mut $name) -> &mut dyn $crate::Field {
                            &mut group.$field
                        }
                        $crate::Child {
                            name: stringify!($field),
                            get,
                            get_mut,
                        }
                    }
                ),*
            ];
        }

        impl $crate::Element for $name {
            fn equal(&self, other: &Self) -> bool {
                $crate::Schema::fields_equal(self, other)
            }

            fn encode(&self, full: bool) -> $crate::Node {
                $crate::Schema::encode_fields(self, full)
            }

            fn decode(
                &mut self,
                node: &$crate::Node,
                field: &str,
            ) -> ::core::result::Result<(), $crate::ParamError> {
                $crate::Schema::decode_fields(self, node, field)
            }
        }
    };
}

/// Declare an enum usable as a leaf value, key or element.
///
/// Each variant is paired with its document name; names match
/// case-insensitively on load. Mark the default variant with `#[default]`.
///
/// ```
/// use paramtree::{param_enum, ParamValue};
///
/// param_enum! {
///     pub enum Quality {
///         #[default]
///         Draft = "draft",
///         Final = "final",
///     }
/// }
///
/// assert_eq!(Quality::from_text("FINAL").unwrap(), Quality::Final);
/// assert_eq!(Quality::Draft.to_text(), "draft");
/// ```
#[macro_export]
macro_rules! param_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Document names in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl $crate::ParamValue for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn to_text(&self) -> ::std::string::String {
                self.as_str().to_string()
            }

            fn from_text(text: &str) -> ::core::result::Result<Self, $crate::ValueError> {
                let trimmed = text.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::ValueError::new(text, stringify!($name)))
            }
        }

        impl $crate::Element for $name {
            fn equal(&self, other: &Self) -> bool {
                self == other
            }

            fn encode(&self, _full: bool) -> $crate::Node {
                $crate::Node::scalar($crate::ParamValue::to_text(self))
            }

            fn decode(
                &mut self,
                node: &$crate::Node,
                field: &str,
            ) -> ::core::result::Result<(), $crate::ParamError> {
                *self = $crate::decode_scalar(node, field)?;
                Ok(())
            }
        }
    };
}
