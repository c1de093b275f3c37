//! PDF export of a day's tasks. Tasks are grouped by project, every project gets a banner and a
//! table with the status cell colored by progress.
//!
//! Layout is written against [canvas::Canvas], [pdf::PdfCanvas] turns it into a document.

pub mod canvas;
pub mod layout;
pub mod metrics;
pub mod pdf;

use std::{collections::BTreeMap, path::Path};

use anyhow::Result;
use tracing::{info, instrument};

use crate::{
    storage::{
        entities::{Status, TaskEntity},
        task_store::TaskCollection,
    },
    utils::{
        clock::Clock,
        time::{report_file_name, report_generation_date},
    },
};

use canvas::{Canvas, Font, Logo, Rgb};
use layout::{Cell, DocumentWriter, Header};
use pdf::PdfCanvas;

pub const PT_TO_MM: f32 = 25.4 / 72.;

pub const REPORT_TITLE: &str = "SKETCHCOM DAILY DASHBOARD";
pub const MISSING_RESPONSIBLE: &str = "N/A";
pub const PDF_MIME_TYPE: &str = "application/pdf";

const BANNER_WIDTH: f32 = 180.;
const ROW_HEIGHT: f32 = 8.;
const TASK_WIDTH: f32 = 80.;
const STATUS_WIDTH: f32 = 30.;
const RESPONSIBLE_WIDTH: f32 = 70.;
const SECTION_GAP: f32 = 5.;

const BANNER_FONT: Font = Font::bold(10.);
const TABLE_FONT: Font = Font::regular(8.);
const BANNER_FILL: Rgb = Rgb::RED;
const TABLE_HEADER_FILL: Rgb = Rgb::GRAY;

/// Exported document together with the name it should be saved under.
#[derive(Debug)]
pub struct Report {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ReportGenerator {
    clock: Box<dyn Clock>,
}

impl ReportGenerator {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Renders every task of `collection`. Fails if the logo can't be read, nothing else in the
    /// pass touches the disk.
    #[instrument(skip(self, collection), fields(date = %collection.date()))]
    pub async fn generate(&self, collection: &TaskCollection, logo_path: &Path) -> Result<Report> {
        let logo = Logo::load(logo_path).await?;
        let canvas = render(PdfCanvas::new(REPORT_TITLE)?, self.header(logo), collection);
        let bytes = canvas.finish()?;
        info!("Rendered report of {} bytes", bytes.len());
        Ok(Report {
            file_name: report_file_name(collection.date()),
            bytes,
        })
    }

    fn header(&self, logo: Logo) -> Header {
        Header {
            logo,
            title: REPORT_TITLE.into(),
            subtitle: format!(
                "Generated on: {}",
                report_generation_date(self.clock.time())
            ),
        }
    }
}

/// Lays the collection out on `canvas`, one section per project in name order.
pub fn render<C: Canvas>(canvas: C, header: Header, collection: &TaskCollection) -> C {
    let mut writer = DocumentWriter::new(canvas, header);
    writer.add_page();
    for (project, tasks) in group_by_project(collection.tasks()) {
        project_section(&mut writer, project, &tasks);
    }
    writer.into_canvas()
}

/// Tasks without a project belong to no section and are left out.
fn group_by_project(tasks: &[TaskEntity]) -> BTreeMap<&str, Vec<&TaskEntity>> {
    let mut groups = BTreeMap::<&str, Vec<&TaskEntity>>::new();
    for task in tasks.iter().filter(|v| !v.project.trim().is_empty()) {
        groups.entry(task.project.as_str()).or_default().push(task);
    }
    groups
}

/// Background of the status cell. Unknown statuses are left unfilled.
pub fn status_fill(status: &Status) -> Option<Rgb> {
    match status {
        Status::Pending => Some(Rgb::RED),
        Status::InProgress => Some(Rgb::YELLOW),
        Status::Completed => Some(Rgb::GREEN),
        Status::Other(_) => None,
    }
}

fn project_section<C: Canvas>(writer: &mut DocumentWriter<C>, project: &str, tasks: &[&TaskEntity]) {
    writer.set_text_color(Rgb::WHITE);
    writer.set_font(BANNER_FONT);
    let banner = format!("Project: {project}");
    writer.cell(
        Cell::new(BANNER_WIDTH, ROW_HEIGHT, &banner)
            .filled(Some(BANNER_FILL))
            .line_break(),
    );

    writer.set_text_color(Rgb::BLACK);
    writer.set_font(TABLE_FONT);
    for (width, title) in [
        (TASK_WIDTH, "Task"),
        (STATUS_WIDTH, "Status"),
        (RESPONSIBLE_WIDTH, "Responsible"),
    ] {
        writer.cell(
            Cell::new(width, ROW_HEIGHT, title)
                .bordered()
                .centered()
                .filled(Some(TABLE_HEADER_FILL)),
        );
    }
    writer.ln(ROW_HEIGHT);

    for task in tasks {
        writer.cell(Cell::new(TASK_WIDTH, ROW_HEIGHT, &task.task).bordered().centered());
        writer.cell(
            Cell::new(STATUS_WIDTH, ROW_HEIGHT, task.status.as_str())
                .bordered()
                .centered()
                .filled(status_fill(&task.status)),
        );
        writer.cell(
            Cell::new(
                RESPONSIBLE_WIDTH,
                ROW_HEIGHT,
                task.responsible.as_deref().unwrap_or(MISSING_RESPONSIBLE),
            )
            .bordered()
            .centered(),
        );
        writer.ln(ROW_HEIGHT);
    }

    writer.ln(SECTION_GAP);
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use printpdf::image_crate::DynamicImage;
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::Status,
            task_store::tests::{collection_of, new_task, TEST_DATE},
        },
        utils::clock::MockClock,
    };

    use super::{
        canvas::{Canvas, Font, Logo, Rgb},
        layout::Header,
        render, ReportGenerator, REPORT_TITLE,
    };

    /// Left edge of the status column.
    const STATUS_X: f32 = 90.;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Page,
        Fill { x: f32, y: f32, color: Rgb },
        Stroke,
        Text { text: String, color: Rgb },
        Image,
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
    }

    impl RecordingCanvas {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|v| match v {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn status_fills(&self) -> Vec<Rgb> {
            self.ops
                .iter()
                .filter_map(|v| match v {
                    Op::Fill { x, color, .. } if *x == STATUS_X && *color != Rgb::GRAY => {
                        Some(*color)
                    }
                    _ => None,
                })
                .collect()
        }

        fn count(&self, op: &Op) -> usize {
            self.ops.iter().filter(|v| *v == op).count()
        }
    }

    impl Canvas for RecordingCanvas {
        fn add_page(&mut self) {
            self.ops.push(Op::Page);
        }

        fn fill_rect(&mut self, x: f32, y: f32, _w: f32, _h: f32, color: Rgb) {
            self.ops.push(Op::Fill { x, y, color });
        }

        fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
            self.ops.push(Op::Stroke);
        }

        fn text(&mut self, _x: f32, _y: f32, _font: Font, color: Rgb, text: &str) {
            self.ops.push(Op::Text {
                text: text.to_string(),
                color,
            });
        }

        fn image(&mut self, _logo: &Logo, _x: f32, _y: f32, _width: f32) {
            self.ops.push(Op::Image);
        }
    }

    fn test_header() -> Header {
        Header {
            logo: Logo::from_image(DynamicImage::new_rgb8(32, 16)),
            title: REPORT_TITLE.into(),
            subtitle: "Generated on: 10 January 2024".into(),
        }
    }

    #[test]
    fn test_sections_follow_project_name_order() {
        let collection = collection_of(
            TEST_DATE,
            vec![
                new_task("B", "second", Status::Completed, Some("Asha")),
                new_task("A", "first", Status::Pending, None),
            ],
        );

        let canvas = render(RecordingCanvas::default(), test_header(), &collection);
        let texts = canvas.texts();

        let a = texts.iter().position(|v| *v == "Project: A").unwrap();
        let b = texts.iter().position(|v| *v == "Project: B").unwrap();
        assert!(a < b);
        assert_eq!(canvas.count(&Op::Page), 1);

        // Section A holds the pending task, section B the completed one.
        assert_eq!(canvas.status_fills(), vec![Rgb::RED, Rgb::GREEN]);
        assert!(texts.contains(&"N/A"));
        assert!(texts.contains(&"Asha"));
    }

    #[test]
    fn test_tasks_without_project_are_left_out() {
        let collection = collection_of(
            TEST_DATE,
            vec![
                new_task("", "orphan", Status::Pending, None),
                new_task("IT", "Backup", Status::Completed, None),
            ],
        );

        let canvas = render(RecordingCanvas::default(), test_header(), &collection);
        let texts = canvas.texts();
        assert!(!texts.contains(&"orphan"));
        assert!(!texts.contains(&"Project: "));
        assert!(texts.contains(&"Project: IT"));
        assert_eq!(canvas.status_fills(), vec![Rgb::GREEN]);
    }

    #[test]
    fn test_banner_is_white_on_red() {
        let collection = collection_of(
            TEST_DATE,
            vec![new_task("DUDP", "Layout", Status::Pending, None)],
        );
        let canvas = render(RecordingCanvas::default(), test_header(), &collection);

        let banner = canvas
            .ops
            .iter()
            .position(|v| matches!(v, Op::Text { text, .. } if text == "Project: DUDP"))
            .unwrap();
        assert_eq!(
            canvas.ops[banner],
            Op::Text {
                text: "Project: DUDP".into(),
                color: Rgb::WHITE
            }
        );
        assert!(matches!(canvas.ops[banner - 1], Op::Fill { color: Rgb::RED, x, .. } if x == 10.));

        let texts = canvas.texts();
        assert_eq!(
            texts,
            vec![
                REPORT_TITLE,
                "Generated on: 10 January 2024",
                "Project: DUDP",
                "Task",
                "Status",
                "Responsible",
                "Layout",
                "Pending",
                "N/A",
            ]
        );
    }

    #[test]
    fn test_status_colors() {
        let collection = collection_of(
            TEST_DATE,
            vec![
                new_task("IT", "a", Status::InProgress, None),
                new_task("IT", "b", Status::Pending, None),
                new_task("IT", "c", Status::Other("Blocked".into()), None),
                new_task("IT", "d", Status::Completed, None),
            ],
        );
        let canvas = render(RecordingCanvas::default(), test_header(), &collection);

        // The unknown status row draws no fill at all instead of reusing the previous color.
        assert_eq!(
            canvas.status_fills(),
            vec![Rgb::YELLOW, Rgb::RED, Rgb::GREEN]
        );
        assert!(canvas.texts().contains(&"Blocked"));
    }

    #[test]
    fn test_long_collection_breaks_pages_and_repeats_header() {
        let tasks = (0..40)
            .map(|i| new_task("IT", &format!("task {i}"), Status::Pending, None))
            .collect();
        let collection = collection_of(TEST_DATE, tasks);
        let canvas = render(RecordingCanvas::default(), test_header(), &collection);

        let pages = canvas.count(&Op::Page);
        assert_eq!(pages, 2);
        assert_eq!(canvas.count(&Op::Image), pages);
        assert_eq!(
            canvas.texts().iter().filter(|v| **v == REPORT_TITLE).count(),
            pages
        );
        // Rows keep their order across the break.
        let texts = canvas.texts();
        let first = texts.iter().position(|v| *v == "task 0").unwrap();
        let last = texts.iter().position(|v| *v == "task 39").unwrap();
        assert!(first < last);

        // Nothing is drawn below the bottom margin.
        assert!(canvas.ops.iter().all(|v| match v {
            Op::Fill { y, .. } => *y + 8. <= 277.,
            _ => true,
        }));
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_time()
            .return_const(Utc.with_ymd_and_hms(2024, 1, 12, 4, 0, 0).unwrap());
        clock
    }

    #[tokio::test]
    async fn test_generate_pdf() -> Result<()> {
        let dir = tempdir()?;
        let logo_path = dir.path().join("sketch.png");
        DynamicImage::new_rgb8(32, 32).save(&logo_path)?;

        let collection = collection_of(
            TEST_DATE,
            vec![new_task("DUDP", "Layout", Status::Pending, None)],
        );
        let generator = ReportGenerator::new(Box::new(fixed_clock()));
        let report = generator.generate(&collection, &logo_path).await?;

        assert_eq!(report.file_name, "dashboard-10-01-2024.pdf");
        assert!(report.bytes.starts_with(b"%PDF"));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_without_logo_fails() -> Result<()> {
        let dir = tempdir()?;
        let collection = collection_of(
            TEST_DATE,
            vec![new_task("DUDP", "Layout", Status::Pending, None)],
        );
        let generator = ReportGenerator::new(Box::new(fixed_clock()));
        let result = generator
            .generate(&collection, &dir.path().join("missing.png"))
            .await;
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_header_uses_clock() {
        let generator = ReportGenerator::new(Box::new(fixed_clock()));
        let header = generator.header(Logo::from_image(DynamicImage::new_rgb8(1, 1)));
        assert_eq!(header.subtitle, "Generated on: 12 January 2024");
    }
}
