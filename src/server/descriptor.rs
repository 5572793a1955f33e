//! Generic entity descriptor mounting the CRUD handlers for one entity type

use super::entity_registry::EntityDescriptor;
use super::handlers::{create_entity, delete_entity, get_entity, update_entity};
use crate::core::entity::Entity;
use crate::core::service::EntityService;
use axum::{
    Router,
    routing::{get, post},
};

/// Descriptor exposing an [`EntityService`] under `/api/{resource}`
pub struct CrudDescriptor<T: Entity> {
    service: EntityService<T>,
}

impl<T: Entity> CrudDescriptor<T> {
    pub fn new(service: EntityService<T>) -> Self {
        Self { service }
    }
}

impl<T: Entity> EntityDescriptor for CrudDescriptor<T> {
    fn entity_type(&self) -> &str {
        T::entity_type()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router {
        let collection = format!("/api/{}", T::resource_name());
        let item = format!("{}/{{id}}", collection);

        Router::new()
            .route(&collection, post(create_entity::<T>).put(update_entity::<T>))
            .route(&item, get(get_entity::<T>).delete(delete_entity::<T>))
            .with_state(self.service.clone())
    }
}
