pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Workbook {path} has no worksheets.")]
	NoWorksheet { path: String },
	#[error("Sheet has {rows} rows; at most {max} fit in a worksheet.")]
	TooManyRows { rows: usize, max: u32 },
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Read(#[from] calamine::Error),
	#[error(transparent)]
	Write(#[from] rust_xlsxwriter::XlsxError),
}
