//! Static HTML page rendering.
//!
//! The page is self-contained apart from Plotly.js, which is loaded from
//! its CDN. All figures are embedded as one JSON document and drawn by a
//! short inline script.

use std::fmt::Write as _;

use accident_map_figure::FigureGrid;
use serde::Serialize;

use crate::{Dashboard, DashboardError};

/// Plotly.js bundle the page loads.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Element ID of the main map container.
pub const MAIN_CONTAINER_ID: &str = "main-map";

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1, h2 { text-align: center; }
#main-map { width: 100%; height: 80vh; }
.grid { display: grid; grid-template-columns: 80px repeat(4, 1fr); gap: 6px; align-items: center; }
.grid-header { font-weight: bold; text-align: center; }
.grid-label { font-weight: bold; width: 80px; }
.cell { width: 180px; height: 140px; }
";

const SCRIPT: &str = "\
const figures = JSON.parse(document.getElementById('figures').textContent);
Plotly.newPlot(figures.main.id, figures.main.figure.data, figures.main.figure.layout, { responsive: true });
for (const cell of figures.cells) {
  Plotly.newPlot(cell.id, cell.figure.data, cell.figure.layout, { displayModeBar: false, staticPlot: true });
}
";

#[derive(Serialize)]
struct PlacedFigure<'a, T: Serialize> {
    id: String,
    figure: &'a T,
}

#[derive(Serialize)]
struct PageFigures<'a, T: Serialize, U: Serialize> {
    main: PlacedFigure<'a, T>,
    cells: Vec<PlacedFigure<'a, U>>,
}

/// Element ID of the grid cell at `row`, `column`.
#[must_use]
pub fn cell_id(row: usize, column: usize) -> String {
    format!("cell-{row}-{column}")
}

/// Renders `dashboard` as a complete HTML document.
///
/// # Errors
///
/// Returns [`DashboardError::Json`] if a figure fails to serialize.
pub fn render(dashboard: &Dashboard) -> Result<String, DashboardError> {
    let figures = PageFigures {
        main: PlacedFigure {
            id: MAIN_CONTAINER_ID.to_string(),
            figure: dashboard.main(),
        },
        cells: dashboard
            .grid()
            .into_iter()
            .flat_map(|grid| grid.rows.iter().enumerate())
            .flat_map(|(r, row)| {
                row.cells
                    .iter()
                    .enumerate()
                    .map(move |(c, cell)| PlacedFigure {
                        id: cell_id(r, c),
                        figure: &cell.figure,
                    })
            })
            .collect(),
    };
    let json = embed_json(&serde_json::to_string(&figures)?);

    let title = escape_html(dashboard.title());
    let mut html = String::new();

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{PLOTLY_CDN}\"></script>\n\
         <style>\n{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <div id=\"{MAIN_CONTAINER_ID}\"></div>\n"
    );

    if let Some(grid) = dashboard.grid() {
        let _ = write!(
            html,
            "<h2>{}</h2>\n<div class=\"grid\">\n<div></div>\n",
            escape_html(&grid.title)
        );
        for severity in FigureGrid::columns() {
            let _ = writeln!(
                html,
                "<div class=\"grid-header\">Severity {}</div>",
                severity.value()
            );
        }
        for (r, row) in grid.rows.iter().enumerate() {
            let _ = writeln!(
                html,
                "<div class=\"grid-label\">{}</div>",
                escape_html(&row.label)
            );
            for c in 0..row.cells.len() {
                let _ = writeln!(html, "<div class=\"cell\" id=\"{}\"></div>", cell_id(r, c));
            }
        }
        html.push_str("</div>\n");
    }

    let _ = write!(
        html,
        "<script type=\"application/json\" id=\"figures\">{json}</script>\n\
         <script>\n{SCRIPT}</script>\n</body>\n</html>\n"
    );

    Ok(html)
}

/// Escapes text for use in element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Keeps embedded JSON from closing its `<script>` element early.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use accident_map_dataset::DatasetContext;
    use accident_map_dataset::registry::source_by_id;

    use super::*;

    fn dashboard(id: &str) -> Dashboard {
        let ctx = DatasetContext::new(source_by_id(id).unwrap(), Vec::new(), None, None);
        Dashboard::build(&ctx).unwrap()
    }

    #[test]
    fn one_container_per_grid_cell() {
        let html = render(&dashboard("usa")).unwrap();
        assert_eq!(html.matches("class=\"cell\"").count(), 28);
        assert!(html.contains("id=\"cell-6-3\""));
        assert!(html.contains("Traffic Signal"));
        assert!(html.contains("Severity 4"));
    }

    #[test]
    fn page_without_grid_has_main_map_only() {
        let html = render(&dashboard("california_outline")).unwrap();
        assert_eq!(html.matches("class=\"cell\"").count(), 0);
        assert!(html.contains("id=\"main-map\""));
        assert!(html.contains(PLOTLY_CDN));
    }

    #[test]
    fn embedded_json_is_parseable() {
        let html = render(&dashboard("usa")).unwrap();
        let start = html.find("id=\"figures\">").unwrap() + "id=\"figures\">".len();
        let end = start + html[start..].find("</script>").unwrap();
        let figures: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();

        assert_eq!(figures["main"]["id"], "main-map");
        assert_eq!(figures["cells"].as_array().unwrap().len(), 28);
        assert_eq!(figures["main"]["figure"]["data"][0]["type"], "choropleth");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(embed_json(r#"{"t":"</script>"}"#), r#"{"t":"<\/script>"}"#);
    }
}
