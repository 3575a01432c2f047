/// Implement [`Record`](crate::record::Record) for a struct.
///
/// List the fields the mapper may see. Fields under `readonly { .. }` can be
/// read but never written; fields left out are invisible to the mapper.
/// Every listed field must implement `Serialize`, and every writable field
/// `DeserializeOwned`.
///
/// ```rust
/// use struct_mapper::{impl_record, map_structs};
///
/// #[derive(Debug, Default)]
/// struct ProductPart {
///     id: String,
///     correlation_number: i64,
/// }
///
/// #[derive(Debug, Default)]
/// struct Product {
///     id: String,
///     price: f64,
/// }
///
/// impl_record!(ProductPart { id, correlation_number });
/// impl_record!(Product { id, price });
///
/// let part = ProductPart { id: "Lock".to_string(), correlation_number: 123 };
/// let mut product = Product::default();
/// map_structs(&mut product, &part).unwrap();
/// assert_eq!(product.id, "Lock");
/// assert_eq!(product.price, 0.0);
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $ty:ty { $($field:ident),* $(,)? }
        $(readonly { $($ro:ident),* $(,)? })?
    ) => {
        impl $crate::record::Record for $ty {
            fn record_name(&self) -> String {
                $crate::record::short_type_name::<$ty>()
            }

            fn describe(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<$crate::record::FieldDescriptor>,
                $crate::record::NotRecord,
            > {
                Ok(vec![
                    $(
                        $crate::record::FieldDescriptor::new(
                            stringify!($field),
                            $crate::record::type_name_of(&self.$field),
                            true,
                        ),
                    )*
                    $($(
                        $crate::record::FieldDescriptor::new(
                            stringify!($ro),
                            $crate::record::type_name_of(&self.$ro),
                            false,
                        ),
                    )*)?
                ])
            }

            fn get_field(&self, name: &str) -> Option<$crate::record::Value> {
                match name {
                    $(stringify!($field) => $crate::record::field_value(&self.$field),)*
                    $($(stringify!($ro) => $crate::record::field_value(&self.$ro),)*)?
                    _ => None,
                }
            }

            fn check_field(
                &self,
                name: &str,
                value: &$crate::record::Value,
                coerce_quoted: bool,
            ) -> ::std::result::Result<$crate::record::Value, $crate::error::SkipReason> {
                let _ = (value, coerce_quoted);
                match name {
                    $(stringify!($field) => {
                        $crate::record::check_typed(&self.$field, value, coerce_quoted)
                    })*
                    $($(stringify!($ro) => Err($crate::error::SkipReason::NotSettable),)*)?
                    _ => Err($crate::error::SkipReason::NoSuchField),
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::record::Value,
            ) -> ::std::result::Result<(), $crate::error::SkipReason> {
                match name {
                    $(stringify!($field) => $crate::record::assign_typed(&mut self.$field, value),)*
                    $($(stringify!($ro) => Err($crate::error::SkipReason::NotSettable),)*)?
                    _ => {
                        let _ = value;
                        Err($crate::error::SkipReason::NoSuchField)
                    }
                }
            }
        }
    };
}
