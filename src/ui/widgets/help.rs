//! Help panel widget.

use std::fmt::Write;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Movers",
        &[
            ("movers, m", "Show top gainers and losers"),
            ("retry, r", "Reload movers, bypassing the cache"),
        ],
    ),
    (
        "Search",
        &[
            ("/<text>", "Search symbols as you type"),
            ("search <text>", "Same as /<text>"),
        ],
    ),
    (
        "Symbol detail",
        &[
            ("overview <SYM>", "Company overview"),
            ("quote <SYM>", "Latest quote"),
            ("chart <SYM> [interval]", "Intraday bars (1min 5min 15min 30min 60min)"),
        ],
    ),
    (
        "Watchlists",
        &[
            ("lists, l", "Show watchlists"),
            ("new <name>", "Create a watchlist"),
            ("member <SYM>", "Show which lists hold a symbol"),
            ("toggle <list> [SYM]", "Add or remove a symbol"),
            ("prices <list>", "Latest quotes for a list"),
        ],
    ),
    (
        "General",
        &[("help, ?", "Show this help"), ("quit, q", "Exit")],
    ),
];

/// Help panel listing commands.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(out: &mut String) {
        for (title, commands) in SECTIONS {
            let _ = writeln!(out, "{title}");
            for (usage, description) in *commands {
                let _ = writeln!(out, "  {usage:<24} {description}");
            }
        }
    }
}
