#[derive(Debug, Clone, Default)]
pub struct TelemetryLabels {
    pub platform: String,
    pub endpoint: Option<String>,
    pub message_type: Option<String>,
    pub outcome: Option<String>,
}

impl TelemetryLabels {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    pub fn tags(&self) -> Vec<(String, String)> {
        let mut tags = Vec::with_capacity(4);
        tags.push(("platform".into(), self.platform.clone()));
        if let Some(endpoint) = &self.endpoint {
            tags.push(("endpoint".into(), endpoint.clone()));
        }
        if let Some(kind) = &self.message_type {
            tags.push(("message_type".into(), kind.clone()));
        }
        if let Some(outcome) = &self.outcome {
            tags.push(("outcome".into(), outcome.clone()));
        }
        tags
    }
}
