use serde::{Deserialize, Serialize};

/**
The types a value can have in a Nice9 program.  This covers the scalar kinds
(`int`, `bool`, `string`) along with the array, whose element type may itself
be an array (which is how multi-dimensional arrays are expressed).  `None`
is the type of statements and of procedure calls that do not return a value.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Int,
    Bool,
    #[serde(rename = "string")]
    Str,
    Array(Box<Type>, usize),
    None,
}

impl Type {
    /// Creates the type of an array with `len` elements of type `elem`.
    pub fn array(elem: Type, len: usize) -> Type {
        Type::Array(Box::new(elem), len)
    }

    pub fn is_int(&self) -> bool {
        *self == Type::Int
    }

    pub fn is_bool(&self) -> bool {
        *self == Type::Bool
    }

    pub fn is_string(&self) -> bool {
        *self == Type::Str
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(..))
    }

    /// Returns `true` if a value of this type fits in a single word: ints,
    /// bools and strings (which are represented by the address of their
    /// data).
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Bool | Type::Str)
    }

    /// The number of elements in the outermost dimension of an array type.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Type::Array(_, len) => Some(*len),
            _ => None,
        }
    }

    /// The type of a single element of an array type.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem, _) => Some(elem),
            _ => None,
        }
    }

    /// Returns `true` if both types are the same scalar kind.  Arrays and
    /// `None` are never compatible with anything, including themselves.
    pub fn same_scalar_kind(&self, other: &Type) -> bool {
        self.is_scalar() && self == other
    }

    /// The number of words needed to store a value of this type: the element
    /// count multiplied through every nested array dimension.  `None` if the
    /// product does not fit in a `usize`.
    pub fn storage_size(&self) -> Option<usize> {
        match self {
            Type::Array(elem, len) => elem.storage_size()?.checked_mul(*len),
            Type::None => Some(0),
            _ => Some(1),
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Bool => f.write_str("bool"),
            Type::Str => f.write_str("string"),
            Type::Array(elem, len) => f.write_fmt(format_args!("{}[{}]", elem, len)),
            Type::None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_storage_is_one_word() {
        for ty in [Type::Int, Type::Bool, Type::Str] {
            assert!(ty.is_scalar());
            assert_eq!(ty.storage_size(), Some(1));
        }
        assert_eq!(Type::None.storage_size(), Some(0));
    }

    #[test]
    fn nested_array_storage_multiplies_dimensions() {
        let ty = Type::array(Type::array(Type::array(Type::Int, 4), 3), 2);
        assert_eq!(ty.storage_size(), Some(24));
        assert_eq!(ty.array_len(), Some(2));
        assert_eq!(ty.element().unwrap().storage_size(), Some(12));
        assert!(!ty.is_scalar());
    }

    #[test]
    fn oversized_array_has_no_storage_size() {
        let ty = Type::array(Type::array(Type::Int, usize::MAX / 2), 3);
        assert_eq!(ty.storage_size(), None);
        assert_eq!(ty.element().unwrap().storage_size(), Some(usize::MAX / 2));
        assert_eq!(Type::array(ty, 0).storage_size(), None);
    }

    #[test]
    fn arrays_are_not_a_scalar_kind() {
        let arr = Type::array(Type::Int, 3);
        assert!(!arr.same_scalar_kind(&arr));
        assert!(Type::Int.same_scalar_kind(&Type::Int));
        assert!(!Type::Int.same_scalar_kind(&Type::Bool));
        assert!(!Type::None.same_scalar_kind(&Type::None));
    }

    #[test]
    fn display() {
        assert_eq!(Type::array(Type::array(Type::Bool, 3), 2).to_string(), "bool[3][2]");
        assert_eq!(Type::Str.to_string(), "string");
    }
}
