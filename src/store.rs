use crate::{function::Function, log::Error};

use serde::Serialize;
use serde_json::{to_value, Value};

use std::{collections::HashMap, fmt::Display};

/// A single named entry within a [`Store`].
pub(crate) enum Slot {
    /// Plain data.
    Value(Value),
    /// A function that a "call" block may invoke.
    Function(Box<dyn Function>),
}

/// Provides storage for data and functions that a
/// [`Template`][`crate::Template`] can be rendered with.
pub struct Store {
    data: HashMap<String, Slot>,
}

impl Store {
    /// Create a new [`Store`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::Store;
    ///
    /// let store = Store::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::Store;
    ///
    /// let mut store = Store::new();
    /// let result = store.insert("name", "taylor");
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize + Display,
    {
        let value = to_value(&value)
            .map_err(|_| Error::build(format!("value {value} is unserializable")))?;
        self.data.insert(key.into(), Slot::Value(value));

        Ok(())
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::Store;
    ///
    /// let mut store = Store::new();
    /// store.insert_must("name", "taylor");
    /// ```
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize + Display,
    {
        self.data
            .insert(key.into(), Slot::Value(to_value(value).unwrap()));
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::Store;
    ///
    /// let mut store = Store::new().with("name", "taylor");
    ///
    /// assert!(store.is_ok());
    /// ```
    #[inline]
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize + Display,
    {
        self.insert(key, value)?;

        Ok(self)
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::Store;
    ///
    /// let mut store = Store::new().with_must("name", "taylor");
    /// ```
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize + Display,
    {
        self.insert_must(key, value);

        self
    }

    /// Add a [`Function`] to the [`Store`].
    ///
    /// If anything with the given name already exists in the `Store`, it is
    /// overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::{
    ///     function::{serde::Value, Error},
    ///     Store,
    /// };
    /// use std::collections::HashMap;
    ///
    /// fn first(args: &[Value], _: &HashMap<String, Value>) -> Result<Value, Error> {
    ///     args.first()
    ///         .cloned()
    ///         .ok_or_else(|| Error::build("function `first` expects an argument"))
    /// }
    ///
    /// let mut store = Store::new();
    /// store.insert_function("first", first);
    /// ```
    #[inline]
    pub fn insert_function<S, T>(&mut self, key: S, function: T)
    where
        S: Into<String>,
        T: Function + 'static,
    {
        self.data
            .insert(key.into(), Slot::Function(Box::new(function)));
    }

    /// Add a [`Function`] to the [`Store`].
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// If anything with the given name already exists in the `Store`, it is
    /// overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::{
    ///     function::{serde::Value, Error},
    ///     Store,
    /// };
    /// use std::collections::HashMap;
    ///
    /// fn first(args: &[Value], _: &HashMap<String, Value>) -> Result<Value, Error> {
    ///     args.first()
    ///         .cloned()
    ///         .ok_or_else(|| Error::build("function `first` expects an argument"))
    /// }
    ///
    /// let store = Store::new().with_function("first", first);
    /// ```
    #[inline]
    pub fn with_function<S, T>(mut self, key: S, function: T) -> Self
    where
        S: Into<String>,
        T: Function + 'static,
    {
        self.insert_function(key, function);

        self
    }

    /// Returns a reference to the [`Value`] corresponding to the key.
    ///
    /// Functions are not values, so the key of a registered function
    /// returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::Store;
    ///
    /// let store = Store::new().with_must("name", "taylor");
    /// let result = store.get("name");
    ///
    /// assert_eq!(result.unwrap(), "taylor")
    /// ```
    #[inline]
    pub fn get(&self, index: &str) -> Option<&Value> {
        match self.data.get(index) {
            Some(Slot::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a reference to the [`Slot`] corresponding to the key.
    #[inline]
    pub(crate) fn get_slot(&self, index: &str) -> Option<&Slot> {
        self.data.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;
    use crate::{log::Error, Store};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// A Function used to test Store.
    fn faux_function(_: &[Value], _: &HashMap<String, Value>) -> Result<Value, Error> {
        Ok(json!("hi"))
    }

    #[test]
    fn test_insert() {
        let mut store = Store::new();
        store.insert_must("one", "two");

        assert!(store
            .get("one")
            .is_some_and(|t| t.as_str().unwrap() == "two"));
    }

    #[test]
    fn test_insert_fluent() {
        assert!(Store::new()
            .with_must("three", "four")
            .get("three")
            .is_some_and(|t| t.as_str().unwrap() == "four"))
    }

    #[test]
    fn test_insert_function_shadows_value() {
        let mut store = Store::new();
        store.insert_must("greet", "hello");
        store.insert_function("greet", faux_function);

        assert!(store.get("greet").is_none());
        assert!(matches!(store.get_slot("greet"), Some(Slot::Function(_))));
    }
}
