pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const INFO: &str = "ℹ️";
    pub const FILE: &str = "📄";
    pub const FOLDER: &str = "📂";
    pub const PACKAGE: &str = "📦";
    pub const LINK: &str = "🔗";
    pub const SKIP: &str = "⏭️";
}
