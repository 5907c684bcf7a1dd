// ── Relay Atoms: Constants ─────────────────────────────────────────────────
// Named constants shared by the engine and the CLI.

// ── Listening defaults ─────────────────────────────────────────────────────
// Each sink preset has its own port so both can run side by side.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const SCROLL_DEFAULT_PORT: u16 = 6610;
pub const ECHO_DEFAULT_PORT: u16 = 8080;

// ── Scroll wheel ───────────────────────────────────────────────────────────
// One notch of a conventional wheel (WHEEL_DELTA on Windows).
pub const WHEEL_NOTCH: i32 = 120;

// ── HTTP limits ────────────────────────────────────────────────────────────
// Requests larger than this are cut off; the page, the upgrade and the
// rotate body all fit comfortably.
pub(crate) const MAX_REQUEST_BYTES: usize = 65_536;

// Accept loop wakes up this often to check the stop flag.
pub(crate) const ACCEPT_POLL_MS: u64 = 1_000;

// ── Routes ─────────────────────────────────────────────────────────────────
pub(crate) const WS_PATH: &str = "/ws";
pub(crate) const ROTATE_PATH: &str = "/rotate";

// ── CORS (rotate endpoint) ─────────────────────────────────────────────────
pub(crate) const CORS_ALLOW_ORIGIN: &str = "*";
pub(crate) const CORS_ALLOW_METHODS: &str = "POST, GET, OPTIONS";
pub(crate) const CORS_ALLOW_HEADERS: &str = "Content-Type";
