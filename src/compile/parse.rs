//! Template parser.
//!
//! Utilizes a Lexer to receive instances of Region, which it classifies
//! into fragments and assembles into a new Template containing the
//! Abstract Syntax Tree.
//!
//! This template can be combined with some Store data to produce output.
pub mod scope;
pub mod tree;

mod block;
mod state;

use self::{
    block::Block,
    scope::Scope,
    state::State,
    tree::{Base, Call, Each, IfElse, Literal, Output, Tree, Variable},
};
use crate::{
    compile::{
        lex::{
            fragment::{Fragment, Kind},
            Lexer,
        },
        template::Template,
    },
    log::{expected_keyword, Error, INVALID_SYNTAX, UNBALANCED_BLOCK, UNEXPECTED_BLOCK},
    region::Region,
};
use serde_json::Value;

pub struct Parser<'source> {
    /// Lexer used to pull from source as regions instead of raw text.
    lexer: Lexer<'source>,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Compile the template.
    ///
    /// Returns a new Template, which can be executed with some Store
    /// data to receive output.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a block tag is malformed, or when the
    /// open and closing block tags are unbalanced.
    pub fn compile(mut self) -> Result<Template<'source>, Error> {
        let source = self.lexer.source;

        // Block tags that are still open.
        let mut states: Vec<State> = vec![];

        // Contains the distinct Tree instances within a specific area of
        // the source.
        //
        // Used to remember what belongs to the body of an "each" block and
        // what belongs to the enclosing scope, for example.
        let mut scopes: Vec<Scope> = vec![Scope::new()];

        while let Some(region) = self.lexer.next() {
            let fragment = Fragment::new(source, region);

            match fragment.kind {
                Kind::Text => {
                    scopes.last_mut().unwrap().data.push(Tree::Raw(region));
                }
                Kind::Expression => {
                    let variable = self.parse_variable(fragment.clean);
                    let tree = Tree::Output(Output::from((variable, region)));
                    scopes.last_mut().unwrap().data.push(tree);
                }
                Kind::OpenBlock => match self.parse_block(&fragment)? {
                    Block::If(left, compare) => {
                        states.push(State::If {
                            left,
                            compare,
                            region,
                        });
                        scopes.push(Scope::new());
                    }
                    Block::Each(it) => {
                        states.push(State::Each { it, region });
                        scopes.push(Scope::new());
                    }
                    Block::Else => {
                        scopes.last_mut().unwrap().data.push(Tree::Else);
                    }
                    Block::Call(call) => {
                        scopes.last_mut().unwrap().data.push(Tree::Call(call));
                    }
                },
                Kind::CloseBlock => {
                    let state = match states.pop() {
                        Some(state) => state,
                        None => {
                            return Err(Error::build(UNBALANCED_BLOCK)
                                .with_pointer(source, fragment.region)
                                .with_help("this closing block has no open block to close"));
                        }
                    };

                    let body = scopes
                        .pop()
                        .expect("scope stack should match open block states");
                    let tree = match state {
                        State::If { left, compare, .. } => {
                            let (then_branch, else_branch) = split_branches(body);
                            Tree::IfElse(IfElse {
                                left,
                                compare,
                                then_branch,
                                else_branch,
                            })
                        }
                        State::Each { it, .. } => Tree::Each(Each { it, body }),
                    };
                    scopes.last_mut().unwrap().data.push(tree);
                }
            }
        }

        if let Some(open) = states.first() {
            let (block, region) = match open {
                State::If { region, .. } => ("if", region),
                State::Each { region, .. } => ("each", region),
            };

            return Err(Error::build(UNBALANCED_BLOCK)
                .with_pointer(source, *region)
                .with_help(format!(
                    "did you close the `{block}` block with an `end` block?"
                )));
        }

        assert!(
            scopes.len() == 1,
            "parser should never have >1 scope after compilation"
        );

        Ok(Template {
            scope: scopes.remove(0),
            source,
        })
    }

    /// Parse the contents of a block tag.
    ///
    /// The first word of the tag names the block, and decides how the
    /// remaining words are read.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the block is not recognized, or the
    /// remaining words do not satisfy the named block.
    fn parse_block(&self, fragment: &Fragment) -> Result<Block, Error> {
        let source = self.lexer.source;
        let words = split_words(source, fragment.clean);

        let first = match words.first() {
            Some(first) => *first,
            None => {
                return Err(Error::build(UNEXPECTED_BLOCK)
                    .with_pointer(source, fragment.region)
                    .with_help(expected_keyword("")));
            }
        };

        match first.literal(source) {
            "if" => self.parse_if(fragment, &words),
            "each" => self.parse_each(fragment, &words),
            "else" => Ok(Block::Else),
            "call" => self.parse_call(fragment, &words),
            unexpected => Err(Error::build(UNEXPECTED_BLOCK)
                .with_pointer(source, first)
                .with_help(expected_keyword(unexpected))),
        }
    }

    /// Parse the contents of an "if" block.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] unless the tag holds exactly one expression,
    /// or two expressions separated by a comparator.
    fn parse_if(&self, fragment: &Fragment, words: &[Region]) -> Result<Block, Error> {
        match *words {
            [_, left] => Ok(Block::If(self.parse_base(left), None)),
            [_, left, comparator, right] => Ok(Block::If(
                self.parse_base(left),
                Some((comparator, self.parse_base(right))),
            )),
            _ => Err(Error::build(INVALID_SYNTAX)
                .with_pointer(self.lexer.source, fragment.region)
                .with_help(
                    "`if` blocks expect one expression, or two expressions \
                    separated by a comparator",
                )),
        }
    }

    /// Parse the contents of an "each" block.
    ///
    /// Everything after the first word is one expression, so a literal
    /// such as `[1, 2]` may contain whitespace.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the tag has no expression to iterate.
    fn parse_each(&self, fragment: &Fragment, words: &[Region]) -> Result<Block, Error> {
        if words.len() < 2 {
            return Err(Error::build(INVALID_SYNTAX)
                .with_pointer(self.lexer.source, fragment.region)
                .with_help("`each` blocks expect an expression to iterate, like `{% each items %}`"));
        }

        let rest = Region::new(words[1].begin..fragment.clean.end);
        Ok(Block::Each(self.parse_base(rest)))
    }

    /// Parse the contents of a "call" block.
    ///
    /// The word after `call` names the function. Remaining words become
    /// positional arguments, unless they contain a `=`, which marks a
    /// keyword argument.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the tag has no function name, or a
    /// keyword argument contains more than one `=`.
    fn parse_call(&self, fragment: &Fragment, words: &[Region]) -> Result<Block, Error> {
        let source = self.lexer.source;

        if words.len() < 2 {
            return Err(Error::build(INVALID_SYNTAX)
                .with_pointer(source, fragment.region)
                .with_help("`call` blocks expect a function name, like `{% call greet name %}`"));
        }

        let name = self.parse_variable(words[1]);
        let mut args = vec![];
        let mut kwargs = vec![];

        for word in &words[2..] {
            match word.literal(source).find('=') {
                Some(position) => {
                    let key = Region::new(word.begin..word.begin + position);
                    let value = Region::new(word.begin + position + 1..word.end);
                    if value.literal(source).contains('=') {
                        return Err(Error::build(INVALID_SYNTAX)
                            .with_pointer(source, *word)
                            .with_help(
                                "keyword arguments expect a single `=` between name and value",
                            ));
                    }
                    kwargs.push((key, self.parse_base(value)));
                }
                None => args.push(self.parse_base(*word)),
            }
        }

        Ok(Block::Call(Call {
            name,
            args,
            kwargs,
            region: fragment.region,
        }))
    }

    /// Parse a [`Base`] from the text within the given [`Region`].
    ///
    /// The text becomes a literal value when it parses as JSON in full,
    /// and a variable path otherwise.
    fn parse_base(&self, region: Region) -> Base {
        let literal = region.literal(self.lexer.source);

        match serde_json::from_str::<Value>(literal) {
            Ok(value) => Base::Literal(Literal { value, region }),
            Err(_) => Base::Variable(self.parse_variable(region)),
        }
    }

    /// Parse a [`Variable`] from the text within the given [`Region`].
    ///
    /// A leading `..` marks the path as climbing. The rest splits on `.`
    /// into segments, which may be empty.
    fn parse_variable(&self, region: Region) -> Variable {
        let source = self.lexer.source;
        let climbs = region.literal(source).starts_with("..");
        let offset = if climbs { 2 } else { 0 };

        let mut path = vec![];
        let mut begin = region.begin + offset;
        for segment in source[begin..region.end].split('.') {
            let end = begin + segment.len();
            path.push(Region::new(begin..end));
            begin = end + 1;
        }

        Variable {
            climbs,
            path,
            region,
        }
    }
}

/// Split the body of a finished "if" block into its two branches.
///
/// Trees before the first [`Tree::Else`] belong to the then branch, and
/// later trees belong to the else branch. The markers themselves are
/// dropped.
fn split_branches(body: Scope) -> (Scope, Scope) {
    let mut then_branch = Scope::new();
    let mut else_branch = Scope::new();
    let mut in_else = false;

    for tree in body.data {
        if matches!(tree, Tree::Else) {
            in_else = true;
            continue;
        }
        if in_else {
            else_branch.data.push(tree);
        } else {
            then_branch.data.push(tree);
        }
    }

    (then_branch, else_branch)
}

/// Split a region into its whitespace-separated words.
fn split_words(source: &str, region: Region) -> Vec<Region> {
    let literal = region.literal(source);
    let mut words = vec![];
    let mut begin = None;

    for (offset, character) in literal.char_indices() {
        if character.is_whitespace() {
            if let Some(start) = begin.take() {
                words.push(Region::new(region.begin + start..region.begin + offset));
            }
        } else if begin.is_none() {
            begin = Some(offset);
        }
    }
    if let Some(start) = begin {
        words.push(Region::new(region.begin + start..region.end));
    }

    words
}

#[cfg(test)]
mod tests {
    use super::{Parser, Scope};
    use crate::{
        compile::tree::{Base, Tree},
        log::{INVALID_SYNTAX, UNBALANCED_BLOCK, UNEXPECTED_BLOCK},
    };
    use serde_json::json;

    #[test]
    fn test_parse_text_only() {
        let template = Parser::new("hello there").compile().unwrap();

        assert_eq!(template.scope.data.len(), 1);
        assert!(matches!(template.scope.data[0], Tree::Raw(_)));
    }

    #[test]
    fn test_parse_output() {
        let source = "{{ person.name }}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::Output(output) => {
                assert!(!output.variable.climbs);
                assert_eq!(output.variable.path.len(), 2);
                assert_eq!(output.variable.path[0].literal(source), "person");
                assert_eq!(output.variable.path[1].literal(source), "name");
            }
            unexpected => panic!("expected output, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_output_climbs() {
        let source = "{{ ..name }}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::Output(output) => {
                assert!(output.variable.climbs);
                assert_eq!(output.variable.path.len(), 1);
                assert_eq!(output.variable.path[0].literal(source), "name");
                assert_eq!(output.variable.region.literal(source), "..name");
            }
            unexpected => panic!("expected output, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_if_unary() {
        let source = "{% if ready %}go{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::IfElse(if_else) => {
                assert!(if_else.compare.is_none());
                assert_eq!(if_else.then_branch.data.len(), 1);
                assert!(if_else.else_branch.data.is_empty());
            }
            unexpected => panic!("expected if block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_if_binary() {
        let source = "{% if count > 1 %}many{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::IfElse(if_else) => {
                let (comparator, right) = if_else.compare.as_ref().unwrap();
                assert_eq!(comparator.literal(source), ">");
                assert_eq!(*right, Base::Literal(super::Literal {
                    value: json!(1),
                    region: (14..15).into(),
                }));
            }
            unexpected => panic!("expected if block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_if_arity() {
        let result = Parser::new("{% if a > b extra %}x{% end %}").compile();

        assert_eq!(result.unwrap_err().get_reason(), INVALID_SYNTAX);
    }

    #[test]
    fn test_parse_each() {
        let source = "{% each items %}{{ it }}{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::Each(each) => {
                assert_eq!(each.it.get_region().literal(source), "items");
                assert_eq!(each.body.data.len(), 1);
            }
            unexpected => panic!("expected each block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_each_literal_list() {
        let source = "{% each [1, 2] %}.{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::Each(each) => {
                assert_eq!(each.it, Base::Literal(super::Literal {
                    value: json!([1, 2]),
                    region: (8..14).into(),
                }));
            }
            unexpected => panic!("expected each block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_each_missing_source() {
        let result = Parser::new("{% each %}x{% end %}").compile();

        assert_eq!(result.unwrap_err().get_reason(), INVALID_SYNTAX);
    }

    #[test]
    fn test_parse_else_partition() {
        let source = "{% if ready %}a{% else %}b{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::IfElse(if_else) => {
                assert_eq!(if_else.then_branch.data.len(), 1);
                assert_eq!(if_else.else_branch.data.len(), 1);
            }
            unexpected => panic!("expected if block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_second_else_joins_first() {
        let source = "{% if ready %}a{% else %}b{% else %}c{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::IfElse(if_else) => {
                assert_eq!(if_else.then_branch.data.len(), 1);
                assert_eq!(if_else.else_branch.data.len(), 2);
            }
            unexpected => panic!("expected if block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_stray_close() {
        let result = Parser::new("a {% end %} b").compile();

        assert_eq!(result.unwrap_err().get_reason(), UNBALANCED_BLOCK);
    }

    #[test]
    fn test_parse_unterminated_block() {
        let result = Parser::new("{% each items %}{{ it }}").compile();
        let error = result.unwrap_err();

        assert_eq!(error.get_reason(), UNBALANCED_BLOCK);
        assert!(format!("{error:#}").contains("did you close the `each` block"));
    }

    #[test]
    fn test_parse_unknown_block() {
        let result = Parser::new("{% loop items %}{% end %}").compile();

        assert_eq!(result.unwrap_err().get_reason(), UNEXPECTED_BLOCK);
    }

    #[test]
    fn test_parse_empty_block() {
        let result = Parser::new("{% %}").compile();

        assert_eq!(result.unwrap_err().get_reason(), UNEXPECTED_BLOCK);
    }

    #[test]
    fn test_parse_call() {
        let source = "{% call greet name loud=true %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::Call(call) => {
                assert_eq!(call.name.region.literal(source), "greet");
                assert_eq!(call.args.len(), 1);
                assert_eq!(call.kwargs.len(), 1);
                assert_eq!(call.kwargs[0].0.literal(source), "loud");
            }
            unexpected => panic!("expected call block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_call_missing_name() {
        let result = Parser::new("{% call %}").compile();

        assert_eq!(result.unwrap_err().get_reason(), INVALID_SYNTAX);
    }

    #[test]
    fn test_parse_call_double_equals() {
        let result = Parser::new("{% call greet a=b=c %}").compile();

        assert_eq!(result.unwrap_err().get_reason(), INVALID_SYNTAX);
    }

    #[test]
    fn test_parse_nested_blocks() {
        let source = "{% each rows %}{% if it %}x{% end %}{% end %}";
        let template = Parser::new(source).compile().unwrap();

        match &template.scope.data[0] {
            Tree::Each(each) => {
                assert!(matches!(each.body.data[0], Tree::IfElse(_)));
            }
            unexpected => panic!("expected each block, found {unexpected:?}"),
        }
    }

    #[test]
    fn test_parse_stranded_else() {
        let template = Parser::new("a{% else %}b").compile().unwrap();

        assert_eq!(template.scope.data.len(), 3);
        assert!(matches!(template.scope.data[1], Tree::Else));
    }

    #[test]
    fn test_split_words() {
        let source = "{% call greet  one two %}";
        let words = super::split_words(source, (3..22).into());

        let literals: Vec<_> = words.iter().map(|w| w.literal(source)).collect();
        assert_eq!(literals, vec!["call", "greet", "one", "two"]);
    }

    #[test]
    fn test_scope_starts_empty() {
        assert!(Scope::new().data.is_empty());
    }
}
