use base64::{Engine, engine::general_purpose::STANDARD};
use lopdf::{
    Document, Object, ObjectId, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};
use tracing::{debug, error, info};

use crate::error::{Result, TimesheetError};
use crate::helpers::canvas::{
    Align, Cell, CellOptions, DrawCommand, FILL_SHADE, FontStyle, Page, Paint, text_width,
};
use crate::models::timesheet::{DayRow, Employee, Period, Week};

pub const PAGE_WIDTH: f32 = 215.9;
pub const PAGE_HEIGHT: f32 = 279.4;
pub const MARGIN: f32 = 10.0;

pub const TITLE_HEIGHT: f32 = 10.0;
pub const TITLE_GAP: f32 = 5.0;
pub const META_HEIGHT: f32 = 7.0;
pub const TABLE_HEADER_HEIGHT: f32 = 7.0;
pub const ROW_HEIGHT: f32 = 7.1;

const LINE_WIDTH: f32 = 0.3;
const TITLE_FONT_SIZE: f32 = 15.0;
const META_FONT_SIZE: f32 = 10.0;
const TABLE_FONT_SIZE: f32 = 9.0;

const COLUMN_UNITS: f32 = 6.0;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// A table column: header label, width in column units and header alignment.
struct Column {
    label: &'static str,
    units: f32,
    align: Align,
}

const COLUMNS: [Column; 6] = [
    Column { label: "Date", units: 0.5, align: Align::Center },
    Column { label: "Day of Week", units: 0.8, align: Align::Left },
    Column { label: "Work or Description", units: 2.5, align: Align::Center },
    Column { label: "Time In", units: 0.7, align: Align::Center },
    Column { label: "Time Out", units: 0.7, align: Align::Center },
    Column { label: "Net Days", units: 0.8, align: Align::Center },
];

/// Descriptive strings written into the document information dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
    pub keywords: String,
}

impl DocumentInfo {
    pub fn new(period_label: &str, company_name: &str, app_name: &str) -> Self {
        Self {
            title: format!("{period_label} Timesheet"),
            subject: format!("Timesheet export for pay period {period_label}"),
            author: company_name.to_string(),
            creator: app_name.to_string(),
            keywords: format!(
                "PDF, Confidential, Employee Timesheet, {app_name} for {company_name}"
            ),
        }
    }
}

/// A compiled timesheet: one page per employee, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetDocument {
    pub info: DocumentInfo,
    pub pages: Vec<Page>,
}

/// Vertical layout position: the top of the next band, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f32,
}

struct Layout<'a> {
    company_name: &'a str,
    period_label: &'a str,
    column_width: f32,
}

impl Layout<'_> {
    fn width(&self, units: f32) -> f32 {
        self.column_width * units
    }
}

/// Lays out the timesheet table for every employee.
pub fn create_timesheet(
    period: Period,
    employees: &[Employee],
    weeks: &[Week],
    company_name: &str,
    app_name: &str,
) -> Result<TimesheetDocument> {
    if employees.is_empty() {
        error!("Refusing to compile a timesheet without employees");
        return Err(TimesheetError::EmptyEmployeeList);
    }
    if weeks.iter().all(|week| week.days.is_empty()) {
        error!("Refusing to compile a timesheet without days");
        return Err(TimesheetError::EmptyPeriod);
    }

    let period_label = period.label()?;
    let layout = Layout {
        company_name,
        period_label: &period_label,
        column_width: (PAGE_WIDTH - 2.0 * MARGIN) / COLUMN_UNITS,
    };

    let pages = employees
        .iter()
        .map(|employee| {
            debug!("Laying out page for {}", employee.full_name);
            employee_page(&layout, employee, weeks)
        })
        .collect::<Vec<_>>();

    info!(
        "Compiled timesheet for {} with {} page(s)",
        period_label,
        pages.len()
    );

    Ok(TimesheetDocument {
        info: DocumentInfo::new(&period_label, company_name, app_name),
        pages,
    })
}

fn employee_page(layout: &Layout, employee: &Employee, weeks: &[Week]) -> Page {
    let mut page = Page::new(employee.full_name.as_str());
    page.set_line_width(LINE_WIDTH);

    let cursor = Cursor { y: MARGIN };
    let cursor = title_band(&mut page, layout, cursor);
    let cursor = meta_band(&mut page, layout, employee, cursor);
    let cursor = table_header(&mut page, layout, cursor);
    let cursor = weeks
        .iter()
        .flat_map(|week| &week.days)
        .fold(cursor, |cursor, day| body_row(&mut page, layout, day, cursor));
    footer(&mut page, layout, cursor);

    page
}

fn title_band(page: &mut Page, layout: &Layout, cursor: Cursor) -> Cursor {
    let baseline = cursor.y + TITLE_HEIGHT;

    page.set_font_size(TITLE_FONT_SIZE);
    page.text(layout.company_name, MARGIN, baseline, Align::Left, FontStyle::Bold);
    page.text(
        &format!("Timesheet | {}", layout.period_label),
        PAGE_WIDTH - MARGIN,
        baseline,
        Align::Right,
        FontStyle::Normal,
    );

    Cursor {
        y: baseline + TITLE_GAP,
    }
}

fn meta_band(page: &mut Page, layout: &Layout, employee: &Employee, cursor: Cursor) -> Cursor {
    let bottom = cursor.y + META_HEIGHT;
    let name_width = layout.width(4.2);

    page.set_font_size(META_FONT_SIZE);
    page.draw_cell(
        Cell::new(MARGIN, bottom, name_width, META_HEIGHT),
        &format!("Employee: {}", employee.full_name),
        &CellOptions::aligned(Align::Left),
    );
    page.draw_cell(
        Cell::new(MARGIN + name_width, bottom, layout.width(1.8), META_HEIGHT),
        &format!("Pay Period: {}", layout.period_label),
        &CellOptions::aligned(Align::Left),
    );

    Cursor { y: bottom }
}

fn table_header(page: &mut Page, layout: &Layout, cursor: Cursor) -> Cursor {
    let bottom = cursor.y + TABLE_HEADER_HEIGHT;

    page.set_font_size(TABLE_FONT_SIZE);
    COLUMNS.iter().fold(MARGIN, |x, column| {
        let width = layout.width(column.units);
        page.draw_cell(
            Cell::new(x, bottom, width, TABLE_HEADER_HEIGHT),
            column.label,
            &CellOptions::aligned(column.align)
                .fill(true)
                .style(FontStyle::Bold),
        );
        x + width
    });

    Cursor { y: bottom }
}

fn body_row(page: &mut Page, layout: &Layout, day: &DayRow, cursor: Cursor) -> Cursor {
    let bottom = cursor.y + ROW_HEIGHT;
    let fill = !day.is_billable;

    let day_of_month = day.date.format("%d").to_string();
    let cells = [
        (day_of_month.as_str(), Align::Right, FontStyle::Normal),
        (day.weekday_name(), Align::Left, FontStyle::Normal),
        (day.description.as_str(), Align::Left, FontStyle::Italic),
        ("", Align::Left, FontStyle::Normal),
        ("", Align::Left, FontStyle::Normal),
        ("", Align::Left, FontStyle::Normal),
    ];

    COLUMNS
        .iter()
        .zip(cells)
        .fold(MARGIN, |x, (column, (text, align, style))| {
            let width = layout.width(column.units);
            page.draw_cell(
                Cell::new(x, bottom, width, ROW_HEIGHT),
                text,
                &CellOptions::aligned(align).fill(fill).style(style),
            );
            x + width
        });

    Cursor { y: bottom }
}

// The total is left blank on purpose; it is filled in by hand.
fn footer(page: &mut Page, layout: &Layout, cursor: Cursor) -> Cursor {
    let bottom = cursor.y + META_HEIGHT;
    let spacer_width = layout.width(4.5);

    page.set_font_size(TABLE_FONT_SIZE);
    page.draw_cell(
        Cell::new(MARGIN, bottom, spacer_width, META_HEIGHT),
        "",
        &CellOptions::aligned(Align::Left).border(false),
    );
    page.draw_cell(
        Cell::new(MARGIN + spacer_width, bottom, layout.width(1.5), META_HEIGHT),
        "Total Days: ",
        &CellOptions::aligned(Align::Left)
            .fill(true)
            .style(FontStyle::Bold),
    );

    Cursor { y: bottom }
}

impl TimesheetDocument {
    /// Encodes the document as PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.to_pdf()?;
        let mut output_buffer: Vec<u8> = Vec::new();

        doc.save_to(&mut output_buffer).map_err(|e| {
            error!("Failed to convert PDF to bytes: {}", e);
            TimesheetError::Serialize(e.to_string())
        })?;

        info!(
            "Successfully converted PDF to bytes, size: {} bytes",
            output_buffer.len()
        );
        Ok(output_buffer)
    }

    /// Encodes the document as an embeddable `data:` URL.
    pub fn to_data_url(&self) -> Result<String> {
        let bytes = self.to_bytes()?;
        Ok(format!(
            "data:application/pdf;filename=generated.pdf;base64,{}",
            STANDARD.encode(bytes)
        ))
    }

    fn to_pdf(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(type1_font("Helvetica"));
        let bold = doc.add_object(type1_font("Helvetica-Bold"));
        let italic = doc.add_object(type1_font("Helvetica-Oblique"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
                "F3" => italic,
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = Content {
                operations: page_operations(page),
            };
            let encoded = content
                .encode()
                .map_err(|e| TimesheetError::Serialize(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    (PAGE_WIDTH * MM_TO_PT).into(),
                    (PAGE_HEIGHT * MM_TO_PT).into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => lopdf::text_string(&self.info.title),
            "Subject" => lopdf::text_string(&self.info.subject),
            "Author" => lopdf::text_string(&self.info.author),
            "Creator" => lopdf::text_string(&self.info.creator),
            "Keywords" => lopdf::text_string(&self.info.keywords),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        debug!("Encoded {} page(s) into PDF objects", self.pages.len());
        Ok(doc)
    }
}

fn type1_font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Encodes `text` for the WinAnsi fonts; characters without a code become '?'.
fn win_ansi_string(text: &str) -> Object {
    let bytes = text.chars().map(win_ansi_byte).collect();
    Object::String(bytes, StringFormat::Literal)
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

fn font_name(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Normal => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

fn pt(mm: f32) -> Object {
    (mm * MM_TO_PT).into()
}

/// Translates page commands into PDF operators, flipping the y axis.
fn page_operations(page: &Page) -> Vec<Operation> {
    let (r, g, b) = FILL_SHADE;
    let shade: Vec<Object> = [r, g, b]
        .iter()
        .map(|c| (*c as f32 / 255.0).into())
        .collect();

    let mut operations = Vec::new();
    for command in page.commands() {
        match command {
            DrawCommand::LineWidth(width) => {
                operations.push(Operation::new("w", vec![pt(*width)]));
            }
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                paint,
            } => {
                let rect = vec![pt(*x), pt(PAGE_HEIGHT - y - height), pt(*width), pt(*height)];
                match paint {
                    Paint::Fill => {
                        operations.push(Operation::new("rg", shade.clone()));
                        operations.push(Operation::new("re", rect));
                        operations.push(Operation::new("f", vec![]));
                    }
                    Paint::Stroke => {
                        operations.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));
                        operations.push(Operation::new("re", rect));
                        operations.push(Operation::new("S", vec![]));
                    }
                }
            }
            DrawCommand::Text { text, .. } if text.is_empty() => {}
            DrawCommand::Text {
                text,
                x,
                y,
                align,
                style,
                size,
            } => {
                let advance = text_width(text, *style) as f32 * size / 1000.0 / MM_TO_PT;
                let left = match align {
                    Align::Left => *x,
                    Align::Center => x - advance / 2.0,
                    Align::Right => x - advance,
                };

                operations.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![font_name(*style).into(), (*size).into()]));
                operations.push(Operation::new("Td", vec![pt(left), pt(PAGE_HEIGHT - y)]));
                operations.push(Operation::new("Tj", vec![win_ansi_string(text)]));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }

    operations
}
