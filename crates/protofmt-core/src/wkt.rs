//! Well-known types registry.
//!
//! The registry is an immutable value built once and shared by reference (or
//! `Arc`) with every pass; it is queried by import filename only.

use serde::Serialize;
use std::collections::BTreeMap;

/// Metadata for one well-known schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellKnownType {
    /// Canonical import path, e.g. `google/protobuf/timestamp.proto`.
    pub filename: String,
    /// Protobuf package declared by the file.
    pub package: String,
    /// Go import path of the generated code.
    pub go_package: String,
}

const STANDARD: &[(&str, &str, &str)] = &[
    (
        "google/protobuf/any.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/anypb",
    ),
    (
        "google/protobuf/api.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/apipb",
    ),
    (
        "google/protobuf/compiler/plugin.proto",
        "google.protobuf.compiler",
        "google.golang.org/protobuf/types/pluginpb",
    ),
    (
        "google/protobuf/descriptor.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/descriptorpb",
    ),
    (
        "google/protobuf/duration.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/durationpb",
    ),
    (
        "google/protobuf/empty.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/emptypb",
    ),
    (
        "google/protobuf/field_mask.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/fieldmaskpb",
    ),
    (
        "google/protobuf/source_context.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/sourcecontextpb",
    ),
    (
        "google/protobuf/struct.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/structpb",
    ),
    (
        "google/protobuf/timestamp.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/timestamppb",
    ),
    (
        "google/protobuf/type.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/typepb",
    ),
    (
        "google/protobuf/wrappers.proto",
        "google.protobuf",
        "google.golang.org/protobuf/types/known/wrapperspb",
    ),
];

/// Immutable filename → [`WellKnownType`] mapping.
#[derive(Debug, Clone, Default)]
pub struct WellKnownTypes {
    by_filename: BTreeMap<String, WellKnownType>,
}

impl WellKnownTypes {
    /// The well-known types distributed with protobuf.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_entries(STANDARD.iter().map(|(filename, package, go_package)| {
            WellKnownType {
                filename: (*filename).to_string(),
                package: (*package).to_string(),
                go_package: (*go_package).to_string(),
            }
        }))
    }

    /// Builds a registry from arbitrary entries.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = WellKnownType>,
    {
        Self {
            by_filename: entries
                .into_iter()
                .map(|t| (t.filename.clone(), t))
                .collect(),
        }
    }

    /// Looks up a filename.
    ///
    /// Only exact canonical paths match; an import that reaches a well-known
    /// file through another include root is not recognized.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&WellKnownType> {
        self.by_filename.get(filename)
    }

    /// Returns true if the filename is a well-known type.
    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }

    /// Iterates entries in filename order.
    pub fn iter(&self) -> impl Iterator<Item = &WellKnownType> {
        self.by_filename.values()
    }

    /// Number of registered files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_filename.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_filename.is_empty()
    }
}
