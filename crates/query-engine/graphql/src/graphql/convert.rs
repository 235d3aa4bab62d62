//! Convert a GraphQL AST to document text.

use super::ast::*;
use super::string::GraphQL;

impl Document {
    /// The document as a single line of GraphQL.
    pub fn print(&self) -> String {
        let mut graphql = GraphQL::new();
        self.to_graphql(&mut graphql);
        graphql.text
    }

    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        self.operation.to_graphql(graphql);
    }
}

impl Operation {
    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        graphql.append_syntax("query ");
        graphql.append_name(&self.name);
        if !self.variable_definitions.is_empty() {
            graphql.append_syntax("(");
            for (index, definition) in self.variable_definitions.iter().enumerate() {
                if index > 0 {
                    graphql.append_syntax(", ");
                }
                definition.to_graphql(graphql);
            }
            graphql.append_syntax(")");
        }
        graphql.append_syntax(" ");
        self.selection_set.to_graphql(graphql);
    }
}

impl VariableDefinition {
    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        graphql.append_variable(&self.name);
        graphql.append_syntax(": ");
        graphql.append_syntax(&self.r#type.to_string());
    }
}

impl SelectionSet {
    /// Nested selection sets are printed from an explicit stack rather than by recursion.
    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        graphql.append_syntax("{ ");
        let mut stack = vec![self.0.iter()];
        while let Some(fields) = stack.last_mut() {
            match fields.next() {
                Some(field) => {
                    field.head_to_graphql(graphql);
                    if field.selection_set.is_empty() {
                        graphql.append_syntax(" ");
                    } else {
                        graphql.append_syntax(" { ");
                        stack.push(field.selection_set.0.iter());
                    }
                }
                None => {
                    stack.pop();
                    graphql.append_syntax("}");
                    if !stack.is_empty() {
                        graphql.append_syntax(" ");
                    }
                }
            }
        }
    }
}

impl Field {
    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        self.head_to_graphql(graphql);
        if !self.selection_set.is_empty() {
            graphql.append_syntax(" ");
            self.selection_set.to_graphql(graphql);
        }
    }

    /// The name and the arguments.
    fn head_to_graphql(&self, graphql: &mut GraphQL) {
        graphql.append_name(&self.name);
        if !self.arguments.is_empty() {
            graphql.append_syntax("(");
            for (index, argument) in self.arguments.iter().enumerate() {
                if index > 0 {
                    graphql.append_syntax(", ");
                }
                argument.to_graphql(graphql);
            }
            graphql.append_syntax(")");
        }
    }
}

impl Argument {
    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        graphql.append_name(&self.name);
        graphql.append_syntax(": ");
        self.value.to_graphql(graphql);
    }
}

impl Value {
    pub fn to_graphql(&self, graphql: &mut GraphQL) {
        match self {
            Value::Variable(name) => graphql.append_variable(name),
            Value::Int(int) => graphql.append_syntax(&int.to_string()),
        }
    }
}
