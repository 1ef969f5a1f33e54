use std::fmt::Debug;

use mbcatalog::{CatalogService, Track};

/// Fournisseur de catalogue vu par le contrôleur de lecture.
///
/// Le contrôleur ne connaît ni le magasin distant ni le cache : il demande
/// une liste de morceaux et, pour chacun, une liste de sources audio à
/// essayer dans l'ordre. Une récupération qui échoue rend une liste vide.
#[async_trait::async_trait]
pub trait CatalogProvider: Debug + Send + Sync {
    /// Récupère le catalogue courant, ou une liste vide si rien n'est joignable.
    async fn fetch(&self) -> Vec<Track>;

    /// Construit les sources audio candidates d'un morceau, les plus fiables
    /// en premier.
    fn resolve(&self, track: &Track) -> Vec<String>;
}

#[async_trait::async_trait]
impl CatalogProvider for CatalogService {
    async fn fetch(&self) -> Vec<Track> {
        self.list().await.as_ref().clone()
    }

    fn resolve(&self, track: &Track) -> Vec<String> {
        CatalogService::resolve(self, track)
    }
}
