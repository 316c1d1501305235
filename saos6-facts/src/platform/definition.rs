//! Platform definition for terminal and session setup.

/// A command sent once when the shell is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnOpenCommand {
    /// Command text.
    pub command: String,

    /// A failure aborts `open()` when set. Otherwise only `warning` is logged.
    pub required: bool,

    /// Warning emitted when an optional command fails.
    pub warning: Option<String>,
}

impl OnOpenCommand {
    /// A command whose failure aborts session setup.
    pub fn required(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            required: true,
            warning: None,
        }
    }

    /// A command whose failure is logged and otherwise ignored.
    pub fn optional(command: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            required: false,
            warning: Some(warning.into()),
        }
    }
}

/// Platform definition containing the vendor-specific terminal configuration.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "ciena_saos6").
    pub name: String,

    /// Network OS reported in device info.
    pub network_os: String,

    /// Patterns that recognise the device prompt at the end of output.
    pub terminal_stdout_re: Vec<String>,

    /// Patterns that recognise an error banner anywhere in output.
    pub terminal_stderr_re: Vec<String>,

    /// Commands to run when the shell is opened, in order.
    pub on_open_commands: Vec<OnOpenCommand>,

    /// Send a newline before waiting for the first prompt.
    pub initial_prompt_newline: bool,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network_os: String::new(),
            terminal_stdout_re: vec![],
            terminal_stderr_re: vec![],
            on_open_commands: vec![],
            initial_prompt_newline: false,
        }
    }

    /// Set the network OS name.
    pub fn with_network_os(mut self, network_os: impl Into<String>) -> Self {
        self.network_os = network_os.into();
        self
    }

    /// Add a prompt pattern.
    pub fn with_prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.terminal_stdout_re.push(pattern.into());
        self
    }

    /// Add an error-banner pattern.
    pub fn with_error_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.terminal_stderr_re.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: OnOpenCommand) -> Self {
        self.on_open_commands.push(command);
        self
    }

    /// Send a newline before waiting for the first prompt.
    pub fn with_initial_prompt_newline(mut self, enabled: bool) -> Self {
        self.initial_prompt_newline = enabled;
        self
    }
}
