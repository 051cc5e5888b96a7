/// Builds a [`Value`](crate::Value) using literal-like syntax.
///
/// `None`, `True` and `False` map to their constants, `[..]` to a list,
/// `(..)` to a tuple, `{k: v, ..}` to a dict, `{a, ..}` to a set and `set()`
/// to the empty set. Any other expression goes through `Value::from`; wrap
/// it in parentheses when it is more than one token inside a container.
///
/// # Examples
///
/// ```rust
/// use latex2pydata::{parse_literal, pydata};
///
/// let value = pydata!({"a": [1, 2.5], "b": (None, True), "c": {"x"}});
/// assert_eq!(value, parse_literal("{'a': [1, 2.5], 'b': (None, True), 'c': {'x'}}").unwrap());
/// ```
#[macro_export]
macro_rules! pydata {
    (None) => {
        $crate::Value::None
    };

    (True) => {
        $crate::Value::Bool(true)
    };

    (False) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::pydata!($elem)),*])
    };

    (( $($elem:tt),* $(,)? )) => {
        $crate::Value::Tuple(vec![$($crate::pydata!($elem)),*])
    };

    (set()) => {
        $crate::Value::Set($crate::PySet::new())
    };

    ({}) => {
        $crate::Value::Dict($crate::PyDict::new())
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let mut dict = $crate::PyDict::new();
        $(
            dict.insert($crate::pydata!($key), $crate::pydata!($value));
        )*
        $crate::Value::Dict(dict)
    }};

    ({ $($elem:tt),+ $(,)? }) => {{
        let mut set = $crate::PySet::new();
        $(
            set.insert($crate::pydata!($elem));
        )*
        $crate::Value::Set(set)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{PyDict, PySet, Value};

    #[test]
    fn test_pydata_macro_constants() {
        assert_eq!(pydata!(None), Value::None);
        assert_eq!(pydata!(True), Value::Bool(true));
        assert_eq!(pydata!(False), Value::Bool(false));
        assert_eq!(pydata!(42), Value::Int(42));
        assert_eq!(pydata!(-7), Value::Int(-7));
        assert_eq!(pydata!(3.5), Value::Float(3.5));
        assert_eq!(pydata!("hello"), Value::Str("hello".to_string()));
    }

    #[test]
    fn test_pydata_macro_sequences() {
        assert_eq!(pydata!([]), Value::List(vec![]));
        assert_eq!(pydata!(()), Value::Tuple(vec![]));
        assert_eq!(
            pydata!([1, "a", None]),
            Value::List(vec![Value::Int(1), Value::from("a"), Value::None])
        );
        assert_eq!(pydata!((1,)), Value::Tuple(vec![Value::Int(1)]));
    }

    #[test]
    fn test_pydata_macro_sets_and_dicts() {
        assert_eq!(pydata!(set()), Value::Set(PySet::new()));
        assert_eq!(pydata!({}), Value::Dict(PyDict::new()));

        let set = pydata!({1, 2, 1});
        assert_eq!(set.as_set().map(PySet::len), Some(2));

        let dict = pydata!({1: 1.0, "k": [True]});
        let dict = dict.as_dict().unwrap();
        assert_eq!(dict.get(&Value::Int(1)), Some(&Value::Float(1.0)));
        assert_eq!(dict.get_str("k"), Some(&Value::List(vec![Value::Bool(true)])));

        let nested = pydata!([{"a"}, (Value::Set(PySet::new()))]);
        assert_eq!(nested.to_string(), "[{'a'}, set()]");
    }
}
