use serde::{Deserialize, Serialize};

/// Nota de etapa de escritura única (nota del director de departamento o del
/// director de sucursal).
///
/// Mientras la nota no ha sido entregada el rol propietario puede reescribir
/// su borrador con `edit`. La primera entrega efectiva (`try_set` con un
/// valor no vacío, o con un borrador ya escrito) sella la nota y a partir de
/// ahí ningún intento posterior la modifica.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageNote {
    value: String,
    #[serde(default)]
    sealed: bool,
}

impl StageNote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye una nota ya entregada (importaciones y datos de ejemplo).
    pub fn sealed_with(value: &str) -> Self {
        let value = value.trim().to_string();
        let sealed = !value.is_empty();
        Self { value, sealed }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Reescribe el borrador. Devuelve `false` si la nota ya fue sellada.
    pub fn edit(&mut self, value: &str) -> bool {
        if self.sealed {
            return false;
        }
        self.value = value.trim().to_string();
        true
    }

    /// Primera escritura gana. Si `value` viene vacío se conserva el borrador
    /// existente; la nota sólo se sella cuando el resultado no es vacío.
    pub fn try_set(&mut self, value: &str) -> bool {
        if self.sealed {
            return false;
        }
        let entered = value.trim();
        if !entered.is_empty() {
            self.value = entered.to_string();
        }
        if self.value.is_empty() {
            return false;
        }
        self.sealed = true;
        true
    }
}
