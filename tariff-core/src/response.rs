use serde_json::{Map, Value};

use crate::error::{Result, TariffError};

/// Разобранный ответ сервиса: набор полей верхнего уровня.
///
/// Ответ с ключом `error` сюда не попадает: он сразу превращается в
/// [`TariffError::RemoteError`].
#[derive(Debug, Clone, PartialEq)]
pub struct TariffResponse {
    fields: Map<String, Value>,
}

impl TariffResponse {
    /// Разбор тела ответа
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| TariffError::MalformedResponse(format!("invalid json: {e}")))?;
        Self::from_value(value)
    }

    /// Разбор уже распарсенного JSON
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(TariffError::MalformedResponse(
                "expected a json object".to_string(),
            ));
        };

        if let Some(err) = fields.get("error") {
            return Err(TariffError::RemoteError(error_message(err)));
        }

        Ok(Self { fields })
    }

    /// Значение поля
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Все поля ответа
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Сумма в копейках из поля `key` (число или числовая строка)
    pub fn minor_units(&self, key: &str) -> Result<f64> {
        let value = self
            .get(key)
            .ok_or_else(|| TariffError::MissingField(key.to_string()))?;

        let amount = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        amount
            .filter(|a| a.is_finite())
            .ok_or_else(|| TariffError::MalformedResponse(format!("{key} is not a number: {value}")))
    }
}

// Сервис кладёт сообщения массивом, берём первое
fn error_message(err: &Value) -> String {
    let first = match err {
        Value::Array(items) => match items.first() {
            Some(v) => v,
            None => return "unknown error".to_string(),
        },
        other => other,
    };
    match first {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
