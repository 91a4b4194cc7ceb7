//! Catalog types exchanged with the `/api/produtos` endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the backend; absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// EAN-13 barcode.
    pub ean: String,
    pub nome: String,
    pub categoria: String,
    pub preco_custo: f64,
    pub preco_venda: f64,
    pub estoque_atual: i64,
    pub estoque_minimo: i64,
    #[serde(default)]
    pub fornecedor: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("field '{0}' must not be empty")]
    Empty(&'static str),

    #[error("field '{0}' must not be negative")]
    Negative(&'static str),
}

impl Product {
    /// Stock at or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.estoque_atual <= self.estoque_minimo
    }

    /// `(venda - custo) / custo`, in percent. `None` when cost is not positive.
    pub fn profit_margin_percent(&self) -> Option<f64> {
        (self.preco_custo > 0.0).then(|| (self.preco_venda - self.preco_custo) / self.preco_custo * 100.0)
    }

    /// Case-insensitive match on EAN, name or category.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.ean, &self.nome, &self.categoria]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    /// Client-side checks before a create/update round trip.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.ean.trim().is_empty() {
            return Err(ProductValidationError::Empty("ean"));
        }
        if self.nome.trim().is_empty() {
            return Err(ProductValidationError::Empty("nome"));
        }
        if self.preco_custo < 0.0 {
            return Err(ProductValidationError::Negative("precoCusto"));
        }
        if self.preco_venda < 0.0 {
            return Err(ProductValidationError::Negative("precoVenda"));
        }
        if self.estoque_minimo < 0 {
            return Err(ProductValidationError::Negative("estoqueMinimo"));
        }
        Ok(())
    }
}

/// Filter a product list the way the catalog search box does; an empty
/// query keeps everything.
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.trim();
    products
        .iter()
        .filter(|product| query.is_empty() || product.matches(query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arroz() -> Product {
        Product {
            id: Some(1),
            ean: "7891234567890".to_string(),
            nome: "Arroz Integral 5kg".to_string(),
            categoria: "Alimentos".to_string(),
            preco_custo: 12.5,
            preco_venda: 18.9,
            estoque_atual: 45,
            estoque_minimo: 10,
            fornecedor: "Distribuidora Alimentos SA".to_string(),
        }
    }

    fn sabao() -> Product {
        Product {
            id: Some(3),
            ean: "7891234567892".to_string(),
            nome: "Sabão em Pó 1kg".to_string(),
            categoria: "Limpeza".to_string(),
            preco_custo: 7.2,
            preco_venda: 12.9,
            estoque_atual: 5,
            estoque_minimo: 5,
            fornecedor: "Limpex Indústria".to_string(),
        }
    }

    #[test]
    fn wire_format_uses_backend_field_names() {
        let value = serde_json::to_value(arroz()).unwrap();
        assert_eq!(value["precoCusto"], json!(12.5));
        assert_eq!(value["estoqueMinimo"], json!(10));

        let mut new_product = arroz();
        new_product.id = None;
        assert!(serde_json::to_value(new_product).unwrap().get("id").is_none());
    }

    #[test]
    fn low_stock_is_inclusive() {
        assert!(!arroz().is_low_stock());
        assert!(sabao().is_low_stock());
    }

    #[test]
    fn margin() {
        let margin = arroz().profit_margin_percent().unwrap();
        assert!((margin - 51.2).abs() < 1e-9);

        let mut free = arroz();
        free.preco_custo = 0.0;
        assert_eq!(free.profit_margin_percent(), None);
    }

    #[test]
    fn search_is_case_insensitive_over_ean_name_category() {
        let catalog = vec![arroz(), sabao()];
        assert_eq!(search_products(&catalog, "LIMPEZA"), vec![&catalog[1]]);
        assert_eq!(search_products(&catalog, "arroz"), vec![&catalog[0]]);
        assert_eq!(search_products(&catalog, "78912345678"), vec![&catalog[0], &catalog[1]]);
        assert_eq!(search_products(&catalog, "  ").len(), 2);
        assert!(search_products(&catalog, "feijão").is_empty());
    }

    #[test]
    fn validation_rejects_blank_and_negative_fields() {
        let mut product = arroz();
        product.nome = "  ".to_string();
        assert_eq!(product.validate(), Err(ProductValidationError::Empty("nome")));

        let mut product = arroz();
        product.preco_venda = -1.0;
        assert_eq!(product.validate(), Err(ProductValidationError::Negative("precoVenda")));

        assert_eq!(arroz().validate(), Ok(()));
    }
}
