/// Newtype over [`graphbind_core::Record`] with its [`graphbind_core::Model`] impl.
///
/// With `registry = PATH`, decoding dispatches on the payload's discriminator through that
/// registry instead of always building `schema`.
macro_rules! record_model {
    (
        $(#[$meta:meta])*
        $name:ident => $schema:path $( , registry = $registry:path )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(graphbind_core::Record);

        impl graphbind_core::Model for $name {
            fn schema() -> &'static graphbind_core::Schema {
                &$schema
            }

            fn wrap(record: graphbind_core::Record) -> Self {
                Self(record)
            }

            fn as_record(&self) -> &graphbind_core::Record {
                &self.0
            }

            fn as_record_mut(&mut self) -> &mut graphbind_core::Record {
                &mut self.0
            }

            fn into_record(self) -> graphbind_core::Record {
                self.0
            }

            $(
                fn create_from_discriminator(
                    node: &dyn graphbind_core::ParseNode,
                ) -> graphbind_core::DecodeResult<graphbind_core::Record> {
                    $registry.create(node)
                }
            )?
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as graphbind_core::Model>::new_default()
            }
        }
    };
}
