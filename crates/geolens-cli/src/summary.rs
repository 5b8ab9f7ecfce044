use console::Style;
use geolens_core::geo::OverlayBounds;
use geolens_core::preview::PreviewOutcome;
use geolens_core::report::{ReportLine, ReportView, REPORT_TITLE};
use geolens_core::viewport::MapView;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    item: Style,
    warning: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            item: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title
            .apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_report(view: &ReportView) {
    let s = Styles::new();
    print_title(&s, REPORT_TITLE);

    match view {
        ReportView::Error(message) => {
            println!("  {}", s.error.apply_to(message));
        }
        ReportView::Sections(sections) => {
            for section in sections {
                println!("  {}", s.header.apply_to(section.kind.title()));
                for line in &section.lines {
                    match line {
                        ReportLine::Field { label, value } => println!(
                            "    {:<24}{}",
                            s.label.apply_to(label),
                            s.value.apply_to(value)
                        ),
                        ReportLine::Item(text) => {
                            println!("    {} {}", s.item.apply_to("\u{2022}"), text)
                        }
                    }
                }
                println!();
            }
        }
    }
}

/// What was built for a raster preview.
pub struct OverlaySummary<'a> {
    pub file: &'a str,
    pub source_size: [usize; 2],
    pub image_size: (u32, u32),
    pub band_count: usize,
    pub opacity: f32,
    pub bounds: OverlayBounds,
}

pub fn print_overlay_summary(summary: &OverlaySummary, outcome: &PreviewOutcome, view: &MapView) {
    let s = Styles::new();
    print_title(&s, "Raster Overlay");

    let rows = [
        ("File", summary.file.to_string()),
        (
            "Raster",
            format!(
                "{}x{}, {} band(s)",
                summary.source_size[0], summary.source_size[1], summary.band_count
            ),
        ),
        (
            "Overlay",
            format!("{}x{}", summary.image_size.0, summary.image_size.1),
        ),
        ("Opacity", format!("{:.2}", summary.opacity)),
        ("Bounds", summary.bounds.to_string()),
    ];
    for (label, value) in rows {
        println!("  {:<14}{}", s.label.apply_to(label), s.value.apply_to(value));
    }
    println!();

    println!("  {}", s.header.apply_to("Viewport"));
    let size = view.size_px();
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{}x{}", size[0], size[1]))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Center"),
        s.value.apply_to(view.center())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(view.zoom())
    );

    match outcome {
        PreviewOutcome::Fitted(_) => {
            println!("    {:<12}{}", s.label.apply_to("View"), s.item.apply_to("fit to bounds"));
        }
        PreviewOutcome::Fallback => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("View"),
                s.warning.apply_to("invalid or missing bounds, default view")
            );
        }
        PreviewOutcome::Failed(message) => {
            println!("    {}", s.error.apply_to(message));
        }
        PreviewOutcome::Stale => {}
    }
}

pub fn print_warning(message: &str) {
    let s = Styles::new();
    println!("{}", s.warning.apply_to(message));
}
