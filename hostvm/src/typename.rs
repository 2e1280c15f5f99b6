/// Type descriptors for interface signatures.
///
/// A descriptor is the name a type is documented under, e.g. `int`, `Optional[str]` or
/// `List[List[int]]`. Composite types build theirs from their parameters' descriptors, so
/// nesting needs no special handling anywhere.
use itertools::Itertools;

use crate::value::Value;

pub trait TypeName {
    fn type_name() -> String;
}

macro_rules! named {
    ($name:expr => $($T:ty),*) => {
        $(
            impl TypeName for $T {
                fn type_name() -> String {
                    String::from($name)
                }
            }
        )*
    };
}

named!("int" => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
named!("float" => f32, f64);
named!("bool" => bool);
named!("str" => String, &str);
named!("None" => ());
named!("object" => Value);

impl<T: TypeName> TypeName for Option<T> {
    fn type_name() -> String {
        format!("Optional[{}]", T::type_name())
    }
}

/// Compose a function signature from argument and return descriptors
pub fn signature(args: &[String], ret: &str) -> String {
    format!("({}) -> {}", args.iter().join(", "), ret)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn primitive_names() {
        assert_eq!(i64::type_name(), "int");
        assert_eq!(u8::type_name(), "int");
        assert_eq!(f64::type_name(), "float");
        assert_eq!(bool::type_name(), "bool");
        assert_eq!(String::type_name(), "str");
        assert_eq!(<()>::type_name(), "None");
        assert_eq!(<Value as TypeName>::type_name(), "object");
    }

    #[test]
    fn optional_names_nest() {
        assert_eq!(<Option<i64>>::type_name(), "Optional[int]");
        assert_eq!(<Option<Option<String>>>::type_name(), "Optional[Optional[str]]");
    }

    #[test]
    fn signatures() {
        assert_eq!(
            signature(&[i64::type_name(), <Option<String>>::type_name()], "None"),
            "(int, Optional[str]) -> None"
        );
        assert_eq!(signature(&[], &bool::type_name()), "() -> bool");
    }
}
