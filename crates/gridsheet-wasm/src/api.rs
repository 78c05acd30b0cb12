use gridsheet_core::{
    CellCoord, CellFormat, Color, ColumnType, FormatAttribute, GridError, ReplaceOptions,
};
use gridsheet_io::{export_csv, import_csv, IoError};
use gridsheet_store::{EditOutcome, GridStore, StoreConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Main spreadsheet engine exposed to JavaScript
#[wasm_bindgen]
pub struct SpreadsheetEngine {
    store: GridStore,
}

/// Structured error object for JavaScript
#[derive(Debug, Serialize, PartialEq)]
pub struct JsGridError {
    code: String,
    message: String,
}

impl From<GridError> for JsGridError {
    fn from(err: GridError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<IoError> for JsGridError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Grid(err) => err.into(),
            IoError::Empty => Self::new("EMPTY_FILE", IoError::Empty.to_string()),
            other => Self::new("IO_ERROR", other.to_string()),
        }
    }
}

impl JsGridError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    fn from_error<E: std::fmt::Display>(err: E) -> Self {
        Self::new("ERROR", err.to_string())
    }
}

type EngineResult<T> = std::result::Result<T, JsGridError>;

fn to_js_error(err: JsGridError) -> JsValue {
    serde_wasm_bindgen::to_value(&err).unwrap_or(JsValue::NULL)
}

/// Cell data for JavaScript
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub raw: String,
    pub display_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub format: CellFormatData,
    pub selected: bool,
    pub row: usize,
    pub col: usize,
}

/// Cell format data for JavaScript, in CSS terms
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellFormatData {
    pub bold: bool,
    pub italic: bool,
    pub font_size: String,
    pub color: String,
}

impl From<&CellFormat> for CellFormatData {
    fn from(format: &CellFormat) -> Self {
        CellFormatData {
            bold: format.bold,
            italic: format.italic,
            font_size: format.font_size_css(),
            color: format.color.to_hex(),
        }
    }
}

/// Parse `"14px"` or `"14"` into a pixel size
fn parse_font_size(input: &str) -> Option<u8> {
    let input = input.trim();
    input
        .strip_suffix("px")
        .unwrap_or(input)
        .trim()
        .parse()
        .ok()
        .filter(|size| *size > 0)
}

fn to_json<T: Serialize>(value: &T) -> EngineResult<String> {
    serde_json::to_string(value).map_err(JsGridError::from_error)
}

impl SpreadsheetEngine {
    fn cell_data(&self, row: usize, col: usize) -> EngineResult<CellData> {
        let cell = self.store.cell(row, col).ok_or(GridError::OutOfBounds {
            row,
            col,
            rows: self.store.rows(),
            cols: self.store.cols(),
        })?;

        Ok(CellData {
            raw: cell.raw.clone(),
            display_value: cell.display_value(),
            error: cell.error.clone(),
            format: CellFormatData::from(&cell.format),
            selected: self.store.selection() == Some(CellCoord::new(row, col)),
            row,
            col,
        })
    }

    fn set_cell(&mut self, row: usize, col: usize, text: &str) -> EngineResult<EditOutcome> {
        Ok(self.store.set_cell(row, col, text)?)
    }

    fn apply_format(&mut self, attribute_json: &str) -> EngineResult<()> {
        let attribute: FormatAttribute =
            serde_json::from_str(attribute_json).map_err(JsGridError::from_error)?;
        Ok(self.store.format_selection(attribute)?)
    }

    fn set_font_size_css(&mut self, size: &str) -> EngineResult<()> {
        let size = parse_font_size(size)
            .ok_or_else(|| JsGridError::new("INVALID_FONT_SIZE", format!("Invalid font size: {}", size)))?;
        Ok(self.store.format_selection(FormatAttribute::FontSize(size))?)
    }

    fn set_color_css(&mut self, color: &str) -> EngineResult<()> {
        let color = Color::parse(color)
            .ok_or_else(|| JsGridError::new("INVALID_COLOR", format!("Invalid color: {}", color)))?;
        Ok(self.store.format_selection(FormatAttribute::Color(color))?)
    }

    fn change_column_type(&mut self, col: usize, column_type: &str) -> EngineResult<()> {
        let column_type: ColumnType = column_type
            .parse()
            .map_err(|msg: String| JsGridError::new("INVALID_COLUMN_TYPE", msg))?;
        Ok(self.store.set_column_type(col, column_type)?)
    }

    fn replace_with(&mut self, options_json: &str) -> EngineResult<usize> {
        let options: ReplaceOptions =
            serde_json::from_str(options_json).map_err(JsGridError::from_error)?;
        Ok(self.store.find_and_replace_with(&options)?)
    }

    fn load_csv(&mut self, text: &str) -> EngineResult<()> {
        let grid = import_csv(text)?;
        self.store.replace_grid(grid);
        Ok(())
    }
}

#[wasm_bindgen]
impl SpreadsheetEngine {
    /// Create an engine with a blank 10x10 grid
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            store: GridStore::new(),
        }
    }

    /// Create an engine from a JSON `StoreConfig`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<SpreadsheetEngine, JsValue> {
        let config: StoreConfig = serde_json::from_str(config_json)
            .map_err(|e| to_js_error(JsGridError::from_error(e)))?;
        let store = GridStore::with_config(config).map_err(|e| to_js_error(e.into()))?;
        Ok(Self { store })
    }

    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.store.rows()
    }

    #[wasm_bindgen(js_name = colCount)]
    pub fn col_count(&self) -> usize {
        self.store.cols()
    }

    /// Validate and store user input.
    /// Returns `{"status":"stored"}` or `{"status":"rejected","message":..}`.
    #[wasm_bindgen(js_name = setCellValue)]
    pub fn set_cell_value(&mut self, row: usize, col: usize, value: &str) -> Result<String, JsValue> {
        self.set_cell(row, col, value)
            .and_then(|outcome| to_json(&outcome))
            .map_err(to_js_error)
    }

    /// Get cell data for rendering
    #[wasm_bindgen(js_name = getCellData)]
    pub fn get_cell_data(&self, row: usize, col: usize) -> Result<String, JsValue> {
        self.cell_data(row, col)
            .and_then(|data| to_json(&data))
            .map_err(to_js_error)
    }

    /// Displayed text of every cell as a JSON matrix
    #[wasm_bindgen(js_name = getDisplayValues)]
    pub fn get_display_values(&self) -> Result<String, JsValue> {
        to_json(&self.store.grid().value_matrix()).map_err(to_js_error)
    }

    /// The whole grid (cells and column types) as JSON
    #[wasm_bindgen(js_name = getGrid)]
    pub fn get_grid(&self) -> Result<String, JsValue> {
        to_json(self.store.grid()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, row: usize, col: usize) -> Result<(), JsValue> {
        self.store
            .select(row, col)
            .map_err(|e| to_js_error(e.into()))
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Selected coordinate as JSON, or `null`
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<String, JsValue> {
        to_json(&self.store.selection()).map_err(to_js_error)
    }

    /// Apply a JSON `FormatAttribute` to the selected cell
    #[wasm_bindgen(js_name = setSelectionFormat)]
    pub fn set_selection_format(&mut self, attribute_json: &str) -> Result<(), JsValue> {
        self.apply_format(attribute_json).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = toggleBold)]
    pub fn toggle_bold(&mut self) -> Result<(), JsValue> {
        self.store.toggle_bold().map_err(|e| to_js_error(e.into()))
    }

    #[wasm_bindgen(js_name = toggleItalic)]
    pub fn toggle_italic(&mut self) -> Result<(), JsValue> {
        self.store.toggle_italic().map_err(|e| to_js_error(e.into()))
    }

    /// Accepts `"18px"` or `"18"`
    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&mut self, size: &str) -> Result<(), JsValue> {
        self.set_font_size_css(size).map_err(to_js_error)
    }

    /// Accepts a hex color or a basic color keyword
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.set_color_css(color).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&mut self) {
        self.store.add_row();
    }

    #[wasm_bindgen(js_name = deleteRow)]
    pub fn delete_row(&mut self) -> bool {
        self.store.delete_row()
    }

    #[wasm_bindgen(js_name = addColumn)]
    pub fn add_column(&mut self) {
        self.store.add_column();
    }

    #[wasm_bindgen(js_name = deleteColumn)]
    pub fn delete_column(&mut self) -> bool {
        self.store.delete_column()
    }

    /// `"text"`, `"number"` or `"date"`
    #[wasm_bindgen(js_name = setColumnType)]
    pub fn set_column_type(&mut self, col: usize, column_type: &str) -> Result<(), JsValue> {
        self.change_column_type(col, column_type).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getColumnTypes)]
    pub fn get_column_types(&self) -> Result<String, JsValue> {
        to_json(&self.store.grid().column_types()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = trimSelection)]
    pub fn trim_selection(&mut self) -> bool {
        self.store.trim()
    }

    #[wasm_bindgen(js_name = upperSelection)]
    pub fn upper_selection(&mut self) -> bool {
        self.store.upper()
    }

    #[wasm_bindgen(js_name = lowerSelection)]
    pub fn lower_selection(&mut self) -> bool {
        self.store.lower()
    }

    /// Returns the number of rows removed
    #[wasm_bindgen(js_name = removeDuplicates)]
    pub fn remove_duplicates(&mut self) -> usize {
        self.store.remove_duplicate_rows()
    }

    /// Global, case-insensitive regex replace. Returns cells changed.
    #[wasm_bindgen(js_name = findReplace)]
    pub fn find_replace(&mut self, pattern: &str, replacement: &str) -> Result<usize, JsValue> {
        self.store
            .find_and_replace(pattern, replacement)
            .map_err(|e| to_js_error(e.into()))
    }

    /// Replace using JSON `ReplaceOptions`
    /// (`{"pattern":..,"replacement":..,"useRegex":true,"matchCase":false}`)
    #[wasm_bindgen]
    pub fn replace(&mut self, options_json: &str) -> Result<usize, JsValue> {
        self.replace_with(options_json).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = exportCsv)]
    pub fn export_csv(&self) -> Result<String, JsValue> {
        export_csv(self.store.grid()).map_err(|e| to_js_error(e.into()))
    }

    /// Replace the whole grid with CSV content
    #[wasm_bindgen(js_name = importCsv)]
    pub fn import_csv(&mut self, text: &str) -> Result<(), JsValue> {
        self.load_csv(text).map_err(to_js_error)
    }

    pub fn recalculate(&mut self) {
        self.store.recompute();
    }
}

impl Default for SpreadsheetEngine {
    fn default() -> Self {
        Self::new()
    }
}
