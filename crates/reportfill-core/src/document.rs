//! In-memory document tree for filled report templates.
//!
//! The model mirrors the WordprocessingML containment hierarchy: a document
//! owns an ordered sequence of blocks (tables and top-level paragraphs),
//! tables own rows, rows own cells, cells own paragraphs, and paragraphs own
//! styled runs. Ownership is strictly top-down; no node holds a reference
//! back into its parent, so the whole tree is freely mutable in place.
//!
//! Anything the fill engine does not need to understand (section properties,
//! hyperlinks, pre-existing drawings, table grids) is carried as verbatim
//! XML fragments in `Raw` variants so a backend can round-trip untouched
//! template content without loss.

/// English Metric Units per inch, the length unit used by `WordprocessingML`
/// drawing extents.
pub const EMU_PER_INCH: u64 = 914_400;

/// Encoded image payload supported for inline placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type registered in `[Content_Types].xml` for this format.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Part-name extension used under `word/media/`.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// An image to be placed inline inside a run, with a fixed display size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Raw encoded bytes, written verbatim as a media part.
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// Display width in EMU.
    pub width_emu: u64,
    /// Display height in EMU.
    pub height_emu: u64,
}

/// Run-level character formatting.
///
/// `raw` holds the verbatim `w:rPr` fragment captured by the backend at
/// parse time and wins over `bold` when serializing, so rewriting a run's
/// text leaves its template styling untouched. Runs created by the fill
/// engine carry only the `bold` flag and get a synthesized `w:rPr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    /// Explicit bold state: `Some(true)` bold on, `Some(false)` bold
    /// forced off, `None` inherited from the paragraph/style chain.
    pub bold: Option<bool>,
    /// Verbatim `w:rPr` XML including the enclosing tags, if parsed.
    pub raw: Option<String>,
}

impl RunStyle {
    /// Style carrying only an explicit bold flag.
    #[must_use]
    pub const fn bold(flag: bool) -> Self {
        Self {
            bold: Some(flag),
            raw: None,
        }
    }
}

/// One piece of run content, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    /// Line break (`w:br` / `w:cr`).
    Break,
    /// Tab stop (`w:tab`).
    Tab,
    Image(InlineImage),
    /// Verbatim XML for unmodeled run children (existing drawings, field
    /// codes).
    Raw(String),
}

/// The smallest styled text unit within a paragraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub style: RunStyle,
    pub content: Vec<RunContent>,
}

impl Run {
    /// Unstyled run from plain text; `\n` becomes a line break, `\t` a tab.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            style: RunStyle::default(),
            content: text_to_content(text),
        }
    }

    /// Run with an explicit bold flag.
    #[must_use]
    pub fn with_bold(text: &str, bold: bool) -> Self {
        Self {
            style: RunStyle::bold(bold),
            content: text_to_content(text),
        }
    }

    /// Run holding a single inline image.
    #[must_use]
    pub fn image(image: InlineImage) -> Self {
        Self {
            style: RunStyle::default(),
            content: vec![RunContent::Image(image)],
        }
    }

    /// Visible text of the run. Breaks map to `\n`, tabs to `\t`; images
    /// and raw fragments contribute nothing.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(t) => out.push_str(t),
                RunContent::Break => out.push('\n'),
                RunContent::Tab => out.push('\t'),
                RunContent::Image(_) | RunContent::Raw(_) => {}
            }
        }
        out
    }

    /// Replace the run's content with `text`, keeping its style (including
    /// any captured `w:rPr`) intact.
    pub fn set_text(&mut self, text: &str) {
        self.content = text_to_content(text);
    }

    /// True if the run contains an inline image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, RunContent::Image(_)))
    }
}

/// Convert plain text into run content, mapping `\n` to breaks and `\t` to
/// tabs. Empty input yields no content items.
#[must_use]
pub fn text_to_content(text: &str) -> Vec<RunContent> {
    let mut content = Vec::new();
    let mut chunk = String::new();
    for ch in text.chars() {
        match ch {
            '\n' => {
                if !chunk.is_empty() {
                    content.push(RunContent::Text(std::mem::take(&mut chunk)));
                }
                content.push(RunContent::Break);
            }
            '\t' => {
                if !chunk.is_empty() {
                    content.push(RunContent::Text(std::mem::take(&mut chunk)));
                }
                content.push(RunContent::Tab);
            }
            _ => chunk.push(ch),
        }
    }
    if !chunk.is_empty() {
        content.push(RunContent::Text(chunk));
    }
    content
}

/// One item of paragraph content, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParaItem {
    Run(Run),
    /// Verbatim XML for unmodeled paragraph children (hyperlinks,
    /// bookmarks, proofing marks).
    Raw(String),
}

/// A paragraph: optional verbatim `w:pPr` plus ordered content items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Verbatim `w:pPr` fragment, if any.
    pub properties: Option<String>,
    pub items: Vec<ParaItem>,
}

impl Paragraph {
    /// Visible text: concatenated run text. Raw fragments are excluded
    /// from matching on purpose.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            if let ParaItem::Run(run) = item {
                out.push_str(&run.text());
            }
        }
        out
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.items.iter().filter_map(|item| match item {
            ParaItem::Run(run) => Some(run),
            ParaItem::Raw(_) => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.items.iter_mut().filter_map(|item| match item {
            ParaItem::Run(run) => Some(run),
            ParaItem::Raw(_) => None,
        })
    }

    pub fn push_run(&mut self, run: Run) {
        self.items.push(ParaItem::Run(run));
    }

    /// Remove all content, keeping the paragraph (and its `w:pPr`) in place.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// One item of cell content, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum CellItem {
    Paragraph(Paragraph),
    /// Verbatim XML for unmodeled cell children (nested tables).
    Raw(String),
}

/// A table cell: optional verbatim `w:tcPr` plus ordered content items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Verbatim `w:tcPr` fragment, if any.
    pub properties: Option<String>,
    pub content: Vec<CellItem>,
}

impl Cell {
    /// Visible text: paragraph texts joined with `\n`. Nested tables and
    /// other raw content are excluded.
    #[must_use]
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        for item in &self.content {
            if let CellItem::Paragraph(p) = item {
                parts.push(p.text());
            }
        }
        parts.join("\n")
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|item| match item {
            CellItem::Paragraph(p) => Some(p),
            CellItem::Raw(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.content.iter_mut().filter_map(|item| match item {
            CellItem::Paragraph(p) => Some(p),
            CellItem::Raw(_) => None,
        })
    }

    /// First paragraph in the cell, if any.
    pub fn first_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.paragraphs_mut().next()
    }

    /// Append a paragraph after all existing content.
    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.content.push(CellItem::Paragraph(paragraph));
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Verbatim `w:trPr` fragment, if any.
    pub properties: Option<String>,
    pub cells: Vec<Cell>,
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Verbatim `w:tblPr` + `w:tblGrid` fragments, if any.
    pub properties: Option<String>,
    pub rows: Vec<Row>,
}

/// One top-level block of body content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Verbatim XML for unmodeled body content (`w:sectPr`, structured
    /// document tags).
    Raw(String),
}

/// An ordered, exclusively-owned document tree.
///
/// The fill pipeline mutates paragraph and run content in place; it never
/// adds or removes tables, rows, or cells, so positional addressing into
/// the template stays valid across all fill stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Table at `index` counting tables only, in document order.
    pub fn table_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.tables_mut().nth(index)
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// Top-level paragraphs outside any table, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }
}
