use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
  /// No hay filas que exportar.
  #[error("No hay datos para exportar")]
  Empty,
  #[error("Formato de exportación desconocido: {0}")]
  UnknownFormat(String),
  #[error("Error de E/S: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
