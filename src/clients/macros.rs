/// Generates the read/write methods every resource client shares, with
/// tracing on each call.
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $singular:ident, $plural:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $plural>](&self) -> Result<Vec<$entity>, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.list().await
                }

                #[tracing::instrument(skip(self, payload))]
                pub async fn [<create_ $singular>](&self, payload: $crate::validation::Payload) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.create(payload).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $singular>](&self, id: u64) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await
                }

                #[tracing::instrument(skip(self, payload))]
                pub async fn [<update_ $singular>](&self, id: u64, payload: $crate::validation::Payload) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.update(id, payload).await
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $singular:ident, $plural:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $singular, $plural);
    };
}
