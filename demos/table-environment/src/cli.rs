#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Columns,
    Generate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Columns => "columns",
            Action::Generate => "generate",
        }
    }
}

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Request to send to the table.
    #[clap(long, value_enum, default_value_t = Action::Generate)]
    pub action: Action,

    /// Query context JSON, as osquery would send it.
    #[clap(long, value_name = "JSON", default_value = "{}")]
    pub context: String,

    /// Enable verbose informational messages.
    #[clap(long)]
    pub verbose: bool,
}
