use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub username: String,
}

/// Who is signed in to the console. Hosts hand this to every screen that
/// needs it; nothing here talks to an identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    operator: Option<Operator>,
}

impl SessionContext {
    pub fn signed_in(username: impl Into<String>) -> Self {
        let mut context = Self::default();
        context.sign_in(username);
        context
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        let username = username.into();
        info!(%username, "operator signed in");
        self.operator = Some(Operator { username });
    }

    pub fn sign_out(&mut self) -> Option<Operator> {
        let previous = self.operator.take();
        if let Some(operator) = &previous {
            info!(username = %operator.username, "operator signed out");
        }
        previous
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.operator.is_some()
    }

    /// Text for the top bar.
    pub fn greeting(&self) -> String {
        match &self.operator {
            Some(operator) => format!("Welcome, {}", operator.username),
            None => "Not signed in".to_string(),
        }
    }
}
