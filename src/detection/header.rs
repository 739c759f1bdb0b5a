//! Header-row heuristic.
//!
//! Two signals, either of which marks row 0 as a header:
//!
//! - **type variance**: the inferred cell types of row 0 differ from row 1, or row 0 is all
//!   text while row 1 has a number;
//! - **known tokens**: a normalized row-0 cell matches a common column name.

/// Common column names of inventory/tabular exports, already normalized.
const HEADER_TOKENS: &[&str] = &[
    // identifiers
    "id", "code", "codigo", "código", "cod", "sku", "reference", "referencia",
    "referência", "part", "part_number", "partnumber", "item", "product", "produto",
    "ean", "gtin", "barcode", "ncm", "serial",
    // descriptions
    "name", "nome", "description", "descricao", "descrição", "desc", "title", "titulo",
    "título", "brand", "marca", "model", "modelo", "manufacturer", "fabricante", "category",
    "categoria", "type", "tipo", "notes", "observacao", "observação",
    // quantities
    "quantity", "quantidade", "qty", "qtd", "qtde", "stock", "estoque", "saldo", "unit",
    "unidade", "uom", "weight", "peso",
    // money
    "price", "preco", "preço", "unit_price", "preco_unitario", "value", "valor", "cost",
    "custo", "total", "currency", "moeda",
    // dates and places
    "date", "created_at", "updated_at", "location", "localizacao", "localização",
    "warehouse", "deposito", "depósito", "supplier", "fornecedor", "status",
];

/// Inferred type of a single raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Empty,
    Int,
    Float,
    String,
}

impl CellType {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// Decide whether the first of `rows` is a header.
///
/// Fewer than two rows cannot be told apart and yield `false`.
pub fn has_header<S: AsRef<str>>(rows: &[Vec<S>]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    type_variance_signal(&rows[0], &rows[1]) || known_token_signal(&rows[0])
}

/// Type of a raw cell: blank, integer after dropping grouping punctuation, float after
/// turning a decimal comma into a point, else string.
pub fn infer_cell_type(raw: &str) -> CellType {
    let s = raw.trim();
    if s.is_empty() {
        return CellType::Empty;
    }
    let ungrouped: String = s.chars().filter(|c| !matches!(c, '.' | ',')).collect();
    if is_integer(&ungrouped) {
        return CellType::Int;
    }
    if s.replace(',', ".").parse::<f64>().is_ok() {
        return CellType::Float;
    }
    CellType::String
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn type_variance_signal<S: AsRef<str>>(first: &[S], second: &[S]) -> bool {
    let first_types: Vec<CellType> = first.iter().map(|c| infer_cell_type(c.as_ref())).collect();
    let second_types: Vec<CellType> = second.iter().map(|c| infer_cell_type(c.as_ref())).collect();

    if first_types != second_types {
        return true;
    }
    first_types.iter().all(|t| *t == CellType::String)
        && second_types.iter().any(|t| t.is_numeric())
}

fn known_token_signal<S: AsRef<str>>(first: &[S]) -> bool {
    first.iter().any(|cell| {
        let normalized = normalize_token(cell.as_ref());
        let compact = normalized.replace('_', "");
        HEADER_TOKENS.contains(&normalized.as_str()) || HEADER_TOKENS.contains(&compact.as_str())
    })
}

/// Lowercase, trim, and map spaces/hyphens to underscores.
pub fn normalize_token(cell: &str) -> String {
    cell.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CellType, has_header, infer_cell_type, normalize_token};

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn cell_types() {
        assert_eq!(infer_cell_type("  "), CellType::Empty);
        assert_eq!(infer_cell_type("10"), CellType::Int);
        assert_eq!(infer_cell_type("1.234.567"), CellType::Int);
        assert_eq!(infer_cell_type("-42"), CellType::Int);
        assert_eq!(infer_cell_type("3,5e2"), CellType::Float);
        assert_eq!(infer_cell_type("1.234,5"), CellType::Int);
        assert_eq!(infer_cell_type("12.5kg"), CellType::String);
        assert_eq!(infer_cell_type("ABC123"), CellType::String);
    }

    #[test]
    fn grouping_punctuation_makes_decimal_comma_an_int() {
        // "10,5" loses its comma before the integer check.
        assert_eq!(infer_cell_type("10,5"), CellType::Int);
    }

    #[test]
    fn header_with_domain_tokens() {
        let r = rows(&[&["codigo", "descricao", "quantidade"], &["ABC123", "Item 1", "10"]]);
        assert!(has_header(&r));
    }

    #[test]
    fn data_rows_are_not_a_header() {
        let r = rows(&[&["ABC123", "Item 1", "10"], &["DEF456", "Item 2", "20"]]);
        assert!(!has_header(&r));
    }

    #[test]
    fn single_row_is_not_a_header() {
        let r = rows(&[&["codigo", "descricao"]]);
        assert!(!has_header(&r));
    }

    #[test]
    fn token_signal_alone_fires() {
        // Same type vector, but "Part Number" normalizes to a known token.
        let r = rows(&[&["Part Number", "Notes"], &["X-1", "fragile"]]);
        assert!(has_header(&r));
    }

    #[test]
    fn compact_variant_matches() {
        let r = rows(&[&["part-number", "foo"], &["a", "b"]]);
        assert!(has_header(&r));
        assert_eq!(normalize_token(" Part-Number "), "part_number");
    }

    #[test]
    fn short_data_values_are_not_header_tokens() {
        let r = rows(&[&["X-1", "UN", "REF", "Obs"], &["X-2", "PC", "ABC", "frágil"]]);
        assert!(!has_header(&r));
    }

    #[test]
    fn unknown_text_header_over_numbers_fires_type_signal() {
        let r = rows(&[&["alpha", "beta"], &["1", "2,5"]]);
        assert!(has_header(&r));
    }
}
