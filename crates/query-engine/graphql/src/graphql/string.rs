/// A GraphQL document under construction.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct GraphQL {
    pub text: String,
}

impl GraphQL {
    pub fn new() -> GraphQL {
        GraphQL::default()
    }

    pub fn append_syntax(&mut self, syntax: &str) {
        self.text.push_str(syntax);
    }

    /// Names come from the schema, which only admits `[_A-Za-z][_0-9A-Za-z]*`.
    pub fn append_name(&mut self, name: &str) {
        self.text.push_str(name);
    }

    pub fn append_variable(&mut self, name: &str) {
        self.text.push('$');
        self.text.push_str(name);
    }
}
