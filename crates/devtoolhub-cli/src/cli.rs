use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "devtoolhub")]
#[command(about = "Developer tools with a local-first, cloud-synced personal vault")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the local snapshots
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// CLI profile name for auth/sync configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the tool catalog
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },
    /// Manage favorite tools
    #[command(alias = "fav")]
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Tool usage history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Encrypted password vault
    Vault {
        /// Master passphrase (falls back to DEVTOOLHUB_MASTER_PASSPHRASE)
        #[arg(long, global = true, value_name = "PASSPHRASE")]
        passphrase: Option<String>,
        #[command(subcommand)]
        command: VaultCommands,
    },
    /// Format, minify and validate JSON
    Json {
        #[command(subcommand)]
        command: JsonCommands,
    },
    /// Generate passwords and check their strength
    Password {
        #[command(subcommand)]
        command: PasswordCommands,
    },
    /// Decode and verify JSON Web Tokens
    Jwt {
        #[command(subcommand)]
        command: JwtCommands,
    },
    /// Convert between Unix timestamps and dates
    Timestamp {
        #[command(subcommand)]
        command: TimestampCommands,
    },
    /// Test regular expressions
    Regex {
        #[command(subcommand)]
        command: RegexCommands,
    },
    /// Inspect URLs and edit query parameters
    Url {
        #[command(subcommand)]
        command: UrlCommands,
    },
    /// Build cron expressions and preview their next runs
    Cron {
        #[command(subcommand)]
        command: CronCommands,
    },
    /// Generate random UUIDs
    Uuid {
        /// Number of UUIDs to generate
        #[arg(short, long, default_value = "1")]
        count: usize,
        /// Render in uppercase
        #[arg(long)]
        uppercase: bool,
        /// Omit hyphens
        #[arg(long)]
        no_hyphens: bool,
    },
    /// Encode, decode and hash text
    Encode {
        #[command(subcommand)]
        command: EncodeCommands,
    },
    /// Generate mock data as JSON
    Mock {
        /// Record kind
        #[arg(long, value_enum, default_value_t = MockKindArg::User)]
        kind: MockKindArg,
        /// Number of records
        #[arg(short, long, default_value = "5")]
        count: usize,
    },
    /// Convert documents through the conversion service
    Convert {
        #[command(subcommand)]
        command: ConvertCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Authenticate CLI profile with Supabase
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MockKindArg {
    User,
    Product,
    Post,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum UnitArg {
    Seconds,
    Milliseconds,
    Auto,
}

/// Text input taken from the argument or, when omitted, from piped stdin.
#[derive(Args, Debug, Clone)]
pub struct TextInput {
    /// Input text (read from stdin when omitted)
    pub input: Option<String>,
}

#[derive(Subcommand)]
pub enum ToolsCommands {
    /// List tools, optionally by category
    List {
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search tools by name, description or tag
    Search {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one tool
    Show { slug: String },
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// Mark a tool as favorite
    Add { slug: String },
    /// Remove a tool from favorites
    Remove { slug: String },
    /// List favorite tools
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reconcile favorites with the cloud
    Sync,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Record that a tool was used
    Record { slug: String },
    /// List recent tool usage
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear local history
    Clear,
    /// Drop malformed, unknown and over-limit entries
    Cleanup,
    /// Reconcile history with the cloud
    Sync,
}

#[derive(Subcommand)]
pub enum VaultCommands {
    /// Add an entry
    Add {
        #[arg(long)]
        website: String,
        #[arg(long)]
        username: String,
        /// Stored password (generated when omitted)
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value = "General")]
        category: String,
    },
    /// List entries
    List {
        /// Print stored passwords
        #[arg(long)]
        reveal: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace an entry's contents
    Update {
        id: String,
        #[arg(long)]
        website: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "General")]
        category: String,
    },
    /// Delete an entry
    Remove { id: String },
    /// Reconcile the vault with the cloud
    Sync,
}

#[derive(Subcommand)]
pub enum JsonCommands {
    /// Pretty-print JSON
    Format {
        #[command(flatten)]
        input: TextInput,
        #[arg(long, default_value = "2")]
        indent: usize,
        /// Sort object keys recursively
        #[arg(long)]
        sort_keys: bool,
    },
    /// Strip insignificant whitespace
    Minify {
        #[command(flatten)]
        input: TextInput,
    },
    /// Check that the input parses
    Validate {
        #[command(flatten)]
        input: TextInput,
    },
}

#[derive(Subcommand)]
pub enum PasswordCommands {
    /// Generate random passwords
    Generate {
        #[arg(short, long, default_value = "16")]
        length: usize,
        #[arg(short, long, default_value = "1")]
        count: usize,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_symbols: bool,
    },
    /// Score a password
    Strength { password: String },
}

#[derive(Subcommand)]
pub enum JwtCommands {
    /// Decode header and payload
    Decode { token: String },
    /// Check an HS256 signature
    Verify {
        token: String,
        #[arg(long)]
        secret: String,
    },
}

#[derive(Subcommand)]
pub enum TimestampCommands {
    /// Convert a Unix timestamp
    FromUnix {
        #[arg(allow_hyphen_values = true)]
        value: i64,
        #[arg(long, value_enum, default_value_t = UnitArg::Auto)]
        unit: UnitArg,
        /// UTC offset for the human rendering, e.g. +08:00
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,
    },
    /// Convert a date/time string
    FromDate {
        text: String,
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,
    },
    /// Show the current time
    Now {
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RegexCommands {
    /// List matches
    Test {
        pattern: String,
        text: String,
        /// Flags: i, m, s, x, g
        #[arg(long, default_value = "g")]
        flags: String,
    },
    /// Replace matches
    Replace {
        pattern: String,
        text: String,
        replacement: String,
        #[arg(long, default_value = "g")]
        flags: String,
    },
}

#[derive(Subcommand)]
pub enum UrlCommands {
    /// Split a URL into its components
    Parse {
        url: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a query parameter
    Set {
        url: String,
        key: String,
        value: String,
    },
    /// Remove a query parameter
    Remove { url: String, key: String },
}

#[derive(Subcommand)]
pub enum CronCommands {
    /// Preview the next runs of an expression (UTC)
    Next {
        expression: String,
        #[arg(short, long, default_value = "5")]
        count: usize,
        /// Start instant (RFC 3339); defaults to now
        #[arg(long)]
        from: Option<String>,
    },
    /// Build an expression from individual fields
    Compose {
        #[arg(long, default_value = "*")]
        minute: String,
        #[arg(long, default_value = "*")]
        hour: String,
        #[arg(long, default_value = "*")]
        day_of_month: String,
        #[arg(long, default_value = "*")]
        month: String,
        #[arg(long, default_value = "*")]
        day_of_week: String,
    },
    /// List well-known templates
    Templates,
}

#[derive(Subcommand)]
pub enum EncodeCommands {
    /// Base64-encode text
    Base64 {
        #[command(flatten)]
        input: TextInput,
        /// Use the URL-safe alphabet without padding
        #[arg(long)]
        url_safe: bool,
    },
    /// Decode base64 text
    Base64Decode {
        #[command(flatten)]
        input: TextInput,
        #[arg(long)]
        url_safe: bool,
    },
    /// Hex-encode text, or decode with --decode
    Hex {
        #[command(flatten)]
        input: TextInput,
        #[arg(long)]
        decode: bool,
    },
    /// SHA-256 digest (hex)
    Sha256 {
        #[command(flatten)]
        input: TextInput,
    },
    /// SHA-512 digest (hex)
    Sha512 {
        #[command(flatten)]
        input: TextInput,
    },
    /// HMAC-SHA256 (hex)
    Hmac {
        #[command(flatten)]
        input: TextInput,
        #[arg(long)]
        key: String,
    },
}

#[derive(Subcommand)]
pub enum ConvertCommands {
    /// Convert a PDF into a Word document and print the download URL
    PdfToDocx {
        path: PathBuf,
        /// Conversion API key (falls back to CLOUDCONVERT_API_KEY)
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Document conversion API base URL
        #[arg(long, value_name = "URL")]
        convert_api_url: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Login with Supabase email/password and store session in keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create a Supabase account
    Register {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show auth status for profile
    Status,
    /// Logout profile and clear stored session
    Logout,
}
