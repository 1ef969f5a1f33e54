//! Opérations sur les tables du backend
//!
//! Les requêtes suivent les conventions PostgREST : `?select=*&order=col.desc`
//! pour les lectures, `col=eq.val` pour les filtres, `Prefer:
//! return=representation` pour récupérer les lignes insérées.

use super::StoreApi;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

impl StoreApi {
    /// Récupère toutes les lignes d'une table
    ///
    /// La lecture est d'abord tentée avec la clé de service si elle est
    /// configurée, puis retombe sur la clé anonyme en cas d'échec.
    ///
    /// # Arguments
    ///
    /// * `table` - Nom de la table
    /// * `order_desc_by` - Colonne de tri descendant (optionnelle)
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order_desc_by: Option<&str>,
    ) -> Result<Vec<T>> {
        match self.select_all_with(table, order_desc_by, true).await {
            Ok(rows) => Ok(rows),
            Err(err) if self.has_service_key() => {
                warn!(table, error = %err, "Privileged select failed, retrying with anon key");
                self.select_all_with(table, order_desc_by, false).await
            }
            Err(err) => Err(err),
        }
    }

    async fn select_all_with<T: DeserializeOwned>(
        &self,
        table: &str,
        order_desc_by: Option<&str>,
        privileged: bool,
    ) -> Result<Vec<T>> {
        let url = self.url(&format!("/rest/v1/{}", table));
        debug!(table, privileged, "Selecting all rows");

        let mut request = self.client().get(&url).query(&[("select", "*")]);
        if let Some(column) = order_desc_by {
            request = request.query(&[("order", format!("{}.desc", column))]);
        }

        let response = self.with_auth(request, privileged).send().await?;
        self.handle_response(response).await
    }

    /// Récupère les lignes d'une table filtrées par égalité sur une colonne
    pub async fn select_eq<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<T>> {
        let url = self.url(&format!("/rest/v1/{}", table));
        debug!(table, column, "Selecting rows by equality");

        let request = self
            .client()
            .get(&url)
            .query(&[("select", "*"), (column, &format!("eq.{}", value))]);

        let response = self.with_auth(request, true).send().await?;
        self.handle_response(response).await
    }

    /// Insère une ligne et retourne la représentation créée par le backend
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<Vec<R>> {
        let url = self.url(&format!("/rest/v1/{}", table));
        debug!(table, "Inserting row");

        let request = self
            .client()
            .post(&url)
            .header("Prefer", "return=representation")
            .json(row);

        let response = self.with_auth(request, true).send().await?;
        self.handle_response(response).await
    }

    /// Supprime les lignes dont `column` vaut `value`
    pub async fn delete_rows(&self, table: &str, column: &str, value: &str) -> Result<()> {
        let url = self.url(&format!("/rest/v1/{}", table));
        debug!(table, column, value, "Deleting rows");

        let request = self
            .client()
            .delete(&url)
            .query(&[(column, format!("eq.{}", value))]);

        let response = self.with_auth(request, true).send().await?;
        self.check_response(response).await?;
        Ok(())
    }
}
