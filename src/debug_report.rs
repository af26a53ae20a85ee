use tapspan::{Entity, EntityKind};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled {
                format!("{}{}{}", color, s.as_ref(), RESET)
            } else {
                s.as_ref().to_string()
            }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled {
                format!("{}{}{}", BOLD, s.as_ref(), RESET)
            } else {
                s.as_ref().to_string()
            }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled {
                format!("{}{}{}", DIM, s.as_ref(), RESET)
            } else {
                s.as_ref().to_string()
            }
        }
    }
}

pub fn print_run(input: &str, entities: &[Entity], color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Scanning: \"{input}\""), ansi::CYAN))
    );

    let phones: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::PhoneNumber)
        .collect();
    let dates: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.kind != EntityKind::PhoneNumber)
        .collect();

    println!("\n{}", palette.paint("━━━ Phone numbers ━━━", ansi::GRAY));
    print_group(&phones, &palette);

    println!("\n{}", palette.paint("━━━ Dates and times ━━━", ansi::GRAY));
    print_group(&dates, &palette);

    if entities.is_empty() {
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No find rule matched the input");
        println!("  • Candidates were rejected by negative, border or codes rules");
        println!("  • Merge passes cleared the surviving spans");
        println!(
            "\n{}",
            palette.dim("  Tip: set RUST_LOG=tapspan=debug to trace the pipelines")
        );
    } else {
        println!("\n{}", palette.paint("━━━ Timeline ━━━", ansi::GRAY));
        print_timeline(entities, &palette);
    }
    println!();
}

fn print_group(group: &[&Entity], palette: &ansi::Palette) {
    if group.is_empty() {
        println!("{}", palette.dim("  none"));
        return;
    }
    for (idx, ent) in group.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            palette.bold(palette.paint(format!("\"{}\"", ent.text), ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("span {}..{}", ent.begin, ent.end), ansi::YELLOW),
        );
        println!(
            "      {} {}",
            palette.dim("kind:"),
            palette.paint(kind_label(ent.kind), ansi::BLUE),
        );
    }
}

/// One combined line per entity, sorted the way a caller building a
/// timeline would sort them.
fn print_timeline(entities: &[Entity], palette: &ansi::Palette) {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|e| e.begin);
    for ent in ordered {
        println!(
            "  {} {} {}",
            palette.paint(format!("{}..{}", ent.begin, ent.end), ansi::YELLOW),
            palette.paint(kind_label(ent.kind), ansi::BLUE),
            palette.dim(format!("\"{}\"", ent.text)),
        );
    }
}

fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::PhoneNumber => "phone number",
        EntityKind::Date => "date",
        EntityKind::Time => "time",
        EntityKind::DateTime => "date-time",
        EntityKind::TimePeriod => "time period",
        EntityKind::Week => "week",
        EntityKind::Today => "today",
    }
}
