/// A value that can be sent as an argument to the API.
///
/// Arguments travel as form fields, so every value is rendered as a string.
pub trait Argument {
    /// The actual value to send to the API
    fn value(&self) -> String;
}

impl Argument for String {
    fn value(&self) -> String {
        self.clone()
    }
}

impl Argument for &str {
    fn value(&self) -> String {
        (*self).to_string()
    }
}

impl Argument for bool {
    fn value(&self) -> String {
        let value = if *self { "1" } else { "0" };
        value.to_string()
    }
}

macro_rules! display_argument {
    ($($ty:ty),*) => {
        $(
            impl Argument for $ty {
                fn value(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_argument!(i32, i64, u32, u64, usize, f32, f64);

/// Ordered list of named arguments for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pairs: Vec<(String, String)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument. Later values for the same name are sent as well.
    pub fn with(mut self, name: impl Into<String>, value: impl Argument) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Argument) {
        self.pairs.push((name.into(), value.value()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}
