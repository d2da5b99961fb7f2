/// Wraps a value which a Python method may move out (e.g. a `Network` moved into a
/// `Trainer`). Any later use raises `ValueError` instead of touching the moved value.
#[macro_export]
macro_rules! MakeConsumable {
    ($name:ident,$inner_type:tt,$obj_name:ident) => {
        pub(super) struct $name {
            obj: Option<$inner_type>,
        }
        impl $name {
            pub(super) fn acquire(val: $inner_type) -> Self {
                Self { obj: Some(val) }
            }
            fn consumed() -> pyo3::PyErr {
                pyo3::exceptions::PyValueError::new_err(std::concat!(
                    "This ",
                    std::stringify!($obj_name),
                    " object is consumed and cannot be used"
                ))
            }
            fn get_ref(self: &Self) -> pyo3::PyResult<&$inner_type> {
                self.obj.as_ref().ok_or_else(Self::consumed)
            }
            fn get_ref_mut(self: &mut Self) -> pyo3::PyResult<&mut $inner_type> {
                self.obj.as_mut().ok_or_else(Self::consumed)
            }
            fn release(&mut self) -> pyo3::PyResult<$inner_type> {
                self.obj.take().ok_or_else(Self::consumed)
            }
        }
    };
}

/// Maps crate errors to `ValueError` carrying their `Display` text.
#[macro_export]
macro_rules! Impl_to_PyErr {
    (for $($t:ty),+) => {
        $(impl From<$t> for PyErr {
            fn from(err: $t) -> Self {
                pyo3::exceptions::PyValueError::new_err(format!("{}", err))
            }
        }
        )*
    }
}
