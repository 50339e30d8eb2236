//! The `schema!` declaration macro.

/// Declare the rewrite schema for an entity type.
///
/// One entry per field, in declaration order:
///
/// - `plain f`: copied verbatim, never recursed into
/// - `reference f`: `Option<E>` identity link, stubbed on dehydrate and
///   looked up on resolve
/// - `references f`: `Vec<E>` of identity links, order preserved
/// - `embed f`: `Option<E>` owned composition, recursed into via `E`'s own
///   schema
/// - `embeds f`: `Vec<E>` of owned compositions, order preserved
///
/// The target types never need to be spelled out; they are inferred from the
/// field types. Expands to an implementation of
/// [`Describe`](crate::schema::Describe) backed by a `static` metadata table
/// with monomorphized sync and async rewrite thunks per annotated field.
///
/// ```ignore
/// schema! {
///     Package {
///         plain id,
///         plain name,
///         reference maintainer,
///         references dependencies,
///         embeds releases,
///     }
/// }
/// ```
#[macro_export]
macro_rules! schema {
    ($ty:ty { $( $kind:ident $field:ident ),* $(,)? }) => {
        impl $crate::schema::Describe for $ty {
            fn schema() -> &'static $crate::schema::TypeSchema<Self> {
                static SCHEMA: $crate::schema::TypeSchema<$ty> =
                    $crate::schema::TypeSchema {
                        type_name: <$ty as $crate::Entity>::KIND,
                        fields: &[$($crate::schema_field!($ty, $kind $field)),*],
                    };
                &SCHEMA
            }
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! schema_field {
    ($ty:ty, plain $field:ident) => {
        $crate::schema::FieldSchema {
            name: stringify!($field),
            annotation: $crate::schema::Annotation::Plain,
            cardinality: $crate::schema::Cardinality::Single,
            rewrite: None,
            rewrite_async: None,
        }
    };
    ($ty:ty, reference $field:ident) => {
        $crate::schema::FieldSchema {
            name: stringify!($field),
            annotation: $crate::schema::Annotation::Reference,
            cardinality: $crate::schema::Cardinality::Single,
            rewrite: Some({
                fn thunk(
                    src: &$ty,
                    dst: &mut $ty,
                    pass: &$crate::rewrite::Pass<'_>,
                ) -> $crate::DepotResult<()> {
                    dst.$field = pass.single(&src.$field)?;
                    Ok(())
                }
                thunk
            }),
            rewrite_async: Some({
                fn thunk<'a>(
                    src: &'a $ty,
                    dst: &'a mut $ty,
                    pass: &'a $crate::rewrite::AsyncResolvePass<'a>,
                ) -> $crate::schema::AsyncFieldFuture<'a> {
                    Box::pin(async move {
                        dst.$field = pass.single(&src.$field).await?;
                        Ok(())
                    })
                }
                thunk
            }),
        }
    };
    ($ty:ty, references $field:ident) => {
        $crate::schema::FieldSchema {
            name: stringify!($field),
            annotation: $crate::schema::Annotation::Reference,
            cardinality: $crate::schema::Cardinality::Collection,
            rewrite: Some({
                fn thunk(
                    src: &$ty,
                    dst: &mut $ty,
                    pass: &$crate::rewrite::Pass<'_>,
                ) -> $crate::DepotResult<()> {
                    dst.$field = pass.collection(&src.$field)?;
                    Ok(())
                }
                thunk
            }),
            rewrite_async: Some({
                fn thunk<'a>(
                    src: &'a $ty,
                    dst: &'a mut $ty,
                    pass: &'a $crate::rewrite::AsyncResolvePass<'a>,
                ) -> $crate::schema::AsyncFieldFuture<'a> {
                    Box::pin(async move {
                        dst.$field = pass.collection(&src.$field).await?;
                        Ok(())
                    })
                }
                thunk
            }),
        }
    };
    ($ty:ty, embed $field:ident) => {
        $crate::schema::FieldSchema {
            name: stringify!($field),
            annotation: $crate::schema::Annotation::Embed,
            cardinality: $crate::schema::Cardinality::Single,
            rewrite: Some({
                fn thunk(
                    src: &$ty,
                    dst: &mut $ty,
                    pass: &$crate::rewrite::Pass<'_>,
                ) -> $crate::DepotResult<()> {
                    dst.$field = pass.embedded(&src.$field)?;
                    Ok(())
                }
                thunk
            }),
            rewrite_async: Some({
                fn thunk<'a>(
                    src: &'a $ty,
                    dst: &'a mut $ty,
                    pass: &'a $crate::rewrite::AsyncResolvePass<'a>,
                ) -> $crate::schema::AsyncFieldFuture<'a> {
                    Box::pin(async move {
                        dst.$field = pass.embedded(&src.$field).await?;
                        Ok(())
                    })
                }
                thunk
            }),
        }
    };
    ($ty:ty, embeds $field:ident) => {
        $crate::schema::FieldSchema {
            name: stringify!($field),
            annotation: $crate::schema::Annotation::Embed,
            cardinality: $crate::schema::Cardinality::Collection,
            rewrite: Some({
                fn thunk(
                    src: &$ty,
                    dst: &mut $ty,
                    pass: &$crate::rewrite::Pass<'_>,
                ) -> $crate::DepotResult<()> {
                    dst.$field = pass.embedded_collection(&src.$field)?;
                    Ok(())
                }
                thunk
            }),
            rewrite_async: Some({
                fn thunk<'a>(
                    src: &'a $ty,
                    dst: &'a mut $ty,
                    pass: &'a $crate::rewrite::AsyncResolvePass<'a>,
                ) -> $crate::schema::AsyncFieldFuture<'a> {
                    Box::pin(async move {
                        dst.$field = pass.embedded_collection(&src.$field).await?;
                        Ok(())
                    })
                }
                thunk
            }),
        }
    };
}
