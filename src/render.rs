mod compare;
mod shadow;

use crate::{
    compile::{
        tree::{Base, Call, IfElse, Tree, Variable},
        Scope, Template,
    },
    log::{
        error_write, expected_comparator, Error, INVALID_SYNTAX, NOT_CALLABLE, NOT_ITERABLE,
        UNRESOLVED_NAME,
    },
    pipe::Pipe,
    Store,
};

use serde_json::Value;

use std::{borrow::Cow, collections::HashMap, fmt::Write};

use self::{
    compare::{compare_values, is_truthy, Comparator},
    shadow::{Found, Shadow},
};

/// Render a [`Template`].
///
/// # Examples
///
/// ```
/// use sprig::{compile, render, Store};
///
/// let template = compile("hello, {{ name }}!");
/// assert!(template.is_ok());
///
/// let output = render(&template.unwrap(), &Store::new().with_must("name", "taylor"));
/// assert_eq!(output.unwrap(), "hello, taylor!");
/// ```
///
/// # Errors
///
/// Returns an [`Error`] when a name fails to resolve, a block receives a
/// value of the wrong type, or a called function fails.
pub fn render<'source>(template: &'source Template, store: &Store) -> Result<String, Error> {
    Renderer::new(template, store).render()
}

pub struct Renderer<'source, 'store> {
    /// The template being rendered.
    template: &'source Template<'source>,
    /// The Store that the Template is rendered with.
    store: &'store Store,
}

impl<'source, 'store> Renderer<'source, 'store> {
    /// Create a new Renderer.
    pub fn new(template: &'source Template<'source>, store: &'store Store) -> Self {
        Renderer { template, store }
    }

    /// Render the [`Template`] stored inside the [`Renderer`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if rendering any of the [`Tree`] instances within
    /// the `Template` fails, or writing the rendered `Tree` to the buffer fails.
    pub fn render(&self) -> Result<String, Error> {
        let mut buffer = String::with_capacity(self.template.source.len());
        let mut pipe = Pipe::new(&mut buffer);
        let mut shadow = Shadow::new(self.store);

        self.render_scope(&self.template.scope, &mut shadow, &mut pipe)?;

        Ok(buffer)
    }

    /// Render the given [`Scope`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if any of the [`Tree`] instances in the `Scope`
    /// cannot be rendered.
    fn render_scope(
        &self,
        scope: &Scope,
        shadow: &mut Shadow,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        for tree in scope.data.iter() {
            match tree {
                Tree::Raw(region) => {
                    let text = region.literal(self.template.source);
                    pipe.write_str(text).map_err(|_| error_write())?;
                }
                Tree::Output(output) => {
                    let value = self.resolve(&output.variable, shadow)?;
                    if is_truthy(&value) {
                        pipe.write_value(&value).map_err(|_| error_write())?;
                    }
                }
                Tree::IfElse(if_else) => {
                    let branch = self.choose_branch(if_else, shadow)?;
                    self.render_scope(branch, shadow, pipe)?;
                }
                Tree::Else => {}
                Tree::Each(each) => {
                    let items = self.sequence(&each.it, shadow)?;
                    for item in items {
                        shadow.push(item);
                        self.render_scope(&each.body, shadow, pipe)?;
                        shadow.pop();
                    }
                }
                Tree::Call(call) => {
                    let value = self.call_function(call, shadow)?;
                    if is_truthy(&value) {
                        pipe.write_value(&value).map_err(|_| error_write())?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Decide which branch of the given [`IfElse`] should be rendered.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if evaluating either side fails, the comparator
    /// is not recognized, or the two values cannot be compared.
    fn choose_branch<'tree>(
        &self,
        if_else: &'tree IfElse,
        shadow: &Shadow,
    ) -> Result<&'tree Scope, Error> {
        let left = self.evaluate(&if_else.left, shadow)?;
        let truthy = match &if_else.compare {
            Some((symbol, base)) => {
                let right = self.evaluate(base, shadow)?;
                let literal = symbol.literal(self.template.source);
                let comparator = match Comparator::from_symbol(literal) {
                    Some(comparator) => comparator,
                    None => {
                        return Err(Error::build(INVALID_SYNTAX)
                            .with_pointer(self.template.source, *symbol)
                            .with_help(expected_comparator(literal)))
                    }
                };

                compare_values(&left, comparator, &right).map_err(|error| {
                    error.with_pointer(
                        self.template.source,
                        if_else.left.get_region().combine(base.get_region()),
                    )
                })?
            }
            None => is_truthy(&left),
        };

        if truthy {
            Ok(&if_else.then_branch)
        } else {
            Ok(&if_else.else_branch)
        }
    }

    /// Evaluate a [`Base`] to return a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the `Base` is a variable that fails to
    /// resolve.
    fn evaluate<'value>(
        &'value self,
        base: &'value Base,
        shadow: &'value Shadow,
    ) -> Result<Cow<'value, Value>, Error> {
        match base {
            Base::Variable(variable) => self.resolve(variable, shadow),
            Base::Literal(literal) => Ok(Cow::Borrowed(&literal.value)),
        }
    }

    /// Resolve a [`Variable`] to the [`Value`] it names.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the name is absent, or refers to a
    /// function.
    fn resolve<'value>(
        &'value self,
        variable: &Variable,
        shadow: &'value Shadow,
    ) -> Result<Cow<'value, Value>, Error> {
        match self.find(variable, shadow)? {
            Found::Value(value) => Ok(Cow::Borrowed(value)),
            Found::Function(_) => Err(self.unresolved(variable)),
        }
    }

    /// Find the entry named by the given [`Variable`].
    ///
    /// The first segment resolves against the innermost frame, or one frame
    /// up when the variable climbs, and the remaining segments walk object
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when any step of the walk fails.
    fn find<'value>(
        &self,
        variable: &Variable,
        shadow: &'value Shadow,
    ) -> Result<Found<'value>, Error> {
        let source = self.template.source;

        let mut depth = shadow.depth();
        if variable.climbs {
            // Climbing out of the base scope leaves nothing to search.
            if depth == 0 {
                return Err(self.unresolved(variable));
            }
            depth -= 1;
        }

        let mut segments = variable.path.iter();
        let first = segments
            .next()
            .expect("variable path should always have at least one segment");
        let mut found = match shadow.get_at(depth, first.literal(source)) {
            Some(found) => found,
            None => return Err(self.unresolved(variable)),
        };

        for segment in segments {
            let value = match found {
                Found::Value(value) => value,
                Found::Function(_) => return Err(self.unresolved(variable)),
            };
            found = match value
                .as_object()
                .and_then(|object| object.get(segment.literal(source)))
            {
                Some(next) => Found::Value(next),
                None => return Err(self.unresolved(variable)),
            };
        }

        Ok(found)
    }

    /// Build the [`Error`] for a [`Variable`] that failed to resolve.
    fn unresolved(&self, variable: &Variable) -> Error {
        let path = variable.region.literal(self.template.source);

        Error::build(UNRESOLVED_NAME)
            .with_pointer(self.template.source, variable.region)
            .with_help(format!(
                "`{path}` is not available in this scope, did you add it to the store?"
            ))
    }

    /// Evaluate a [`Base`] to return the sequence of items an "each" block
    /// visits.
    ///
    /// Arrays yield their elements, strings yield their characters, and
    /// objects yield their keys.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the value is none of those types.
    fn sequence(&self, base: &Base, shadow: &Shadow) -> Result<Vec<Value>, Error> {
        let value = self.evaluate(base, shadow)?;
        let items = match value.as_ref() {
            Value::Array(array) => array.clone(),
            Value::String(text) => text
                .chars()
                .map(|character| Value::String(character.to_string()))
                .collect(),
            Value::Object(object) => object
                .keys()
                .map(|key| Value::String(key.clone()))
                .collect(),
            _ => {
                let literal = base.get_region().literal(self.template.source);
                return Err(Error::build(NOT_ITERABLE)
                    .with_pointer(self.template.source, base.get_region())
                    .with_help(format!("`{literal}` is not an array, string, or object")));
            }
        };

        Ok(items)
    }

    /// Invoke the [`Function`][`crate::function::Function`] named by the
    /// given [`Call`] and return its [`Value`].
    ///
    /// Positional arguments are evaluated first, then keyword arguments,
    /// then the function itself is resolved.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an argument fails to resolve, the name
    /// does not refer to a function, or the function itself fails.
    fn call_function(&self, call: &Call, shadow: &Shadow) -> Result<Value, Error> {
        let source = self.template.source;

        let mut args = vec![];
        for base in &call.args {
            args.push(self.evaluate(base, shadow)?.into_owned());
        }

        let mut kwargs = HashMap::new();
        for (key, base) in &call.kwargs {
            let value = self.evaluate(base, shadow)?.into_owned();
            kwargs.insert(key.literal(source).to_string(), value);
        }

        let function = match self.find(&call.name, shadow)? {
            Found::Function(function) => function,
            Found::Value(_) => {
                let name = call.name.region.literal(source);
                return Err(Error::build(NOT_CALLABLE)
                    .with_pointer(source, call.name.region)
                    .with_help(format!(
                        "`{name}` is not a function, did you register it with `insert_function`?"
                    )));
            }
        };

        function.call(&args, &kwargs).map_err(|error| {
            if error.has_visual() {
                error
            } else {
                error.with_pointer(source, call.name.region)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::{
        compile,
        log::{
            Error, INVALID_SYNTAX, NOT_CALLABLE, NOT_ITERABLE, UNBALANCED_BLOCK, UNRESOLVED_NAME,
        },
        render, Store,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// A Function used to test Renderer.
    fn faux_greet(args: &[Value], kwargs: &HashMap<String, Value>) -> Result<Value, Error> {
        let name = args.first().and_then(Value::as_str).unwrap_or("stranger");
        let loud = kwargs.get("loud").and_then(Value::as_bool).unwrap_or(false);

        let text = if loud {
            format!("HELLO, {}!", name.to_uppercase())
        } else {
            format!("hello, {name}!")
        };
        Ok(json!(text))
    }

    /// A Function used to test Renderer.
    fn faux_fail(_: &[Value], _: &HashMap<String, Value>) -> Result<Value, Error> {
        Err(Error::build("boom"))
    }

    #[test]
    fn test_render_raw() {
        let template = compile("hello there").unwrap();
        let result = Renderer::new(&template, &Store::new()).render();

        assert_eq!(result.unwrap(), "hello there");
    }

    #[test]
    fn test_render_output() {
        let template = compile("hello there, {{ name }}!").unwrap();
        let store = Store::new().with_must("name", "taylor");

        assert_eq!(render(&template, &store).unwrap(), "hello there, taylor!");
    }

    #[test]
    fn test_render_output_nested() {
        let template = compile("{{ person.name }} is {{ person.age }}").unwrap();
        let store = Store::new().with_must("person", json!({"name": "taylor", "age": 28}));

        assert_eq!(render(&template, &store).unwrap(), "taylor is 28");
    }

    #[test]
    fn test_render_output_falsy_suppressed() {
        let template = compile("a{{ value }}b").unwrap();
        let falsy = vec![json!(false), json!(0), json!(""), json!([]), json!({})];

        let mut store = Store::new();
        for value in falsy {
            store.insert_must("value", value);
            assert_eq!(render(&template, &store).unwrap(), "ab");
        }
    }

    #[test]
    fn test_render_output_booleans_and_negatives() {
        let template = compile("{{ flag }} {{ count }}").unwrap();
        let store = Store::new().with_must("flag", true).with_must("count", -12);

        assert_eq!(render(&template, &store).unwrap(), "true -12");
    }

    #[test]
    fn test_render_output_array_format() {
        let template = compile("{{ items }}").unwrap();
        let store = Store::new().with_must("items", json!([1, 2]));

        assert_eq!(render(&template, &store).unwrap(), "[1, 2]");
    }

    #[test]
    fn test_render_output_unresolved() {
        let template = compile("{{ update.name }}").unwrap();
        let store = Store::new().with_must("update", json!({"time": 1}));
        let error = render(&template, &store).unwrap_err();

        assert_eq!(error.get_reason(), UNRESOLVED_NAME);
        assert!(format!("{error:#}").contains("`update.name` is not available"));
    }

    #[test]
    fn test_render_output_number_is_a_name() {
        // Expressions hold paths, never literals, so "5" is a lookup.
        let template = compile("{{ 5 }}").unwrap();
        let error = render(&template, &Store::new()).unwrap_err();

        assert_eq!(error.get_reason(), UNRESOLVED_NAME);
    }

    #[test]
    fn test_render_if_branches() {
        let template = compile("{% if ready %}a{% else %}b{% end %}").unwrap();

        let store = Store::new().with_must("ready", true);
        assert_eq!(render(&template, &store).unwrap(), "a");

        let store = Store::new().with_must("ready", false);
        assert_eq!(render(&template, &store).unwrap(), "b");
    }

    #[test]
    fn test_render_if_comparison() {
        let template = compile("{% if count == 1.0 %}one{% end %}").unwrap();
        let store = Store::new().with_must("count", 1);

        assert_eq!(render(&template, &store).unwrap(), "one");
    }

    #[test]
    fn test_render_if_unknown_comparator() {
        let template = compile("{% if left <> right %}x{% end %}").unwrap();
        let store = Store::new().with_must("left", 1).with_must("right", 2);
        let error = render(&template, &store).unwrap_err();

        assert_eq!(error.get_reason(), INVALID_SYNTAX);
        assert!(format!("{error:#}").contains("expected comparator"));
    }

    #[test]
    fn test_render_if_resolves_before_comparator_check() {
        let template = compile("{% if missing <> 1 %}x{% end %}").unwrap();
        let error = render(&template, &Store::new()).unwrap_err();

        assert_eq!(error.get_reason(), UNRESOLVED_NAME);
    }

    #[test]
    fn test_render_each() {
        let template = compile("{% each items %}{{ it }}{% end %}").unwrap();

        let store = Store::new().with_must("items", json!([1, 2, 3]));
        assert_eq!(render(&template, &store).unwrap(), "123");

        let store = Store::new().with_must("items", json!([]));
        assert_eq!(render(&template, &store).unwrap(), "");
    }

    #[test]
    fn test_render_each_string() {
        let template = compile("{% each word %}{{ it }}.{% end %}").unwrap();
        let store = Store::new().with_must("word", "ab");

        assert_eq!(render(&template, &store).unwrap(), "a.b.");
    }

    #[test]
    fn test_render_each_object_keys() {
        let template = compile("{% each person %}{{ it }} {% end %}").unwrap();
        let store = Store::new().with_must("person", json!({"b": 1, "a": 2}));

        assert_eq!(render(&template, &store).unwrap(), "a b ");
    }

    #[test]
    fn test_render_each_literal() {
        let template = compile("{% each [1, 2] %}{{ it }}{% end %}").unwrap();

        assert_eq!(render(&template, &Store::new()).unwrap(), "12");
    }

    #[test]
    fn test_render_each_not_iterable() {
        let template = compile("{% each count %}x{% end %}").unwrap();
        let store = Store::new().with_must("count", 12);
        let error = render(&template, &store).unwrap_err();

        assert_eq!(error.get_reason(), NOT_ITERABLE);
    }

    #[test]
    fn test_render_each_climbs() {
        let template =
            compile("{% each people %}{{ it }} reports to {{ ..boss }}; {% end %}").unwrap();
        let store = Store::new()
            .with_must("people", json!(["ann", "bob"]))
            .with_must("boss", "eve");

        assert_eq!(
            render(&template, &store).unwrap(),
            "ann reports to eve; bob reports to eve; "
        );
    }

    #[test]
    fn test_render_each_hides_outer_names() {
        let template = compile("{% each items %}{{ boss }}{% end %}").unwrap();
        let store = Store::new()
            .with_must("items", json!([1]))
            .with_must("boss", "eve");
        let error = render(&template, &store).unwrap_err();

        assert_eq!(error.get_reason(), UNRESOLVED_NAME);
    }

    #[test]
    fn test_render_nested_each() {
        let template = compile("{% each rows %}{% each it %}{{ it }}{% end %};{% end %}").unwrap();
        let store = Store::new().with_must("rows", json!([[1, 2], [3]]));

        assert_eq!(render(&template, &store).unwrap(), "12;3;");
    }

    #[test]
    fn test_render_call() {
        let template = compile("{% call greet name %}").unwrap();
        let store = Store::new()
            .with_must("name", "taylor")
            .with_function("greet", faux_greet);

        assert_eq!(render(&template, &store).unwrap(), "hello, taylor!");
    }

    #[test]
    fn test_render_call_kwargs() {
        let template = compile("{% call greet name loud=true %}").unwrap();
        let store = Store::new()
            .with_must("name", "taylor")
            .with_function("greet", faux_greet);

        assert_eq!(render(&template, &store).unwrap(), "HELLO, TAYLOR!");
    }

    #[test]
    fn test_render_call_not_callable() {
        let template = compile("{% call name %}").unwrap();
        let store = Store::new().with_must("name", "taylor");
        let error = render(&template, &store).unwrap_err();

        assert_eq!(error.get_reason(), NOT_CALLABLE);
    }

    #[test]
    fn test_render_call_unknown() {
        let template = compile("{% call nope %}").unwrap();
        let error = render(&template, &Store::new()).unwrap_err();

        assert_eq!(error.get_reason(), UNRESOLVED_NAME);
    }

    #[test]
    fn test_render_call_error_gets_pointer() {
        let template = compile("{% call explode %}").unwrap();
        let store = Store::new().with_function("explode", faux_fail);
        let error = render(&template, &store).unwrap_err();

        assert_eq!(error.get_reason(), "boom");
        assert!(error.has_visual());
    }

    #[test]
    fn test_render_stranded_else() {
        let template = compile("a{% else %}b").unwrap();

        assert_eq!(render(&template, &Store::new()).unwrap(), "ab");
    }

    #[test]
    fn test_render_twice_is_deterministic() {
        let template = compile("{% each items %}{{ it }}{% end %}").unwrap();
        let store = Store::new().with_must("items", json!(["a", "b"]));

        let first = render(&template, &store).unwrap();
        let second = render(&template, &store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_unbalanced_is_compile_error() {
        let error = compile("{% each items %}{{ it }}").unwrap_err();

        assert_eq!(error.get_reason(), UNBALANCED_BLOCK);
    }
}
