//! Field numbers and enum values from `google/protobuf/descriptor.proto`.

#![allow(missing_docs)]

/// `FileDescriptorProto`
pub mod file {
    pub const NAME: u32 = 1;
    pub const PACKAGE: u32 = 2;
    pub const DEPENDENCY: u32 = 3;
    pub const MESSAGE_TYPE: u32 = 4;
    pub const ENUM_TYPE: u32 = 5;
    pub const SERVICE: u32 = 6;
    pub const EXTENSION: u32 = 7;
    pub const OPTIONS: u32 = 8;
    pub const PUBLIC_DEPENDENCY: u32 = 10;
    pub const SYNTAX: u32 = 12;
}

/// `DescriptorProto`
pub mod message {
    pub const NAME: u32 = 1;
    pub const FIELD: u32 = 2;
    pub const NESTED_TYPE: u32 = 3;
    pub const ENUM_TYPE: u32 = 4;
    pub const EXTENSION_RANGE: u32 = 5;
    pub const EXTENSION: u32 = 6;
    pub const OPTIONS: u32 = 7;
    pub const ONEOF_DECL: u32 = 8;
    pub const RESERVED_RANGE: u32 = 9;
    pub const RESERVED_NAME: u32 = 10;

    /// `DescriptorProto.ExtensionRange` and `DescriptorProto.ReservedRange`;
    /// `end` is exclusive.
    pub mod range {
        pub const START: u32 = 1;
        pub const END: u32 = 2;
    }
}

/// `FieldDescriptorProto`
pub mod field {
    pub const NAME: u32 = 1;
    pub const EXTENDEE: u32 = 2;
    pub const NUMBER: u32 = 3;
    pub const LABEL: u32 = 4;
    pub const TYPE: u32 = 5;
    pub const TYPE_NAME: u32 = 6;
    pub const DEFAULT_VALUE: u32 = 7;
    pub const OPTIONS: u32 = 8;
    pub const ONEOF_INDEX: u32 = 9;
    pub const JSON_NAME: u32 = 10;
    pub const PROTO3_OPTIONAL: u32 = 17;

    /// `FieldDescriptorProto.Label`
    pub mod label {
        pub const OPTIONAL: u64 = 1;
        pub const REQUIRED: u64 = 2;
        pub const REPEATED: u64 = 3;
    }

    /// `FieldDescriptorProto.Type`
    pub mod kind {
        pub const DOUBLE: u64 = 1;
        pub const FLOAT: u64 = 2;
        pub const INT64: u64 = 3;
        pub const UINT64: u64 = 4;
        pub const INT32: u64 = 5;
        pub const FIXED64: u64 = 6;
        pub const FIXED32: u64 = 7;
        pub const BOOL: u64 = 8;
        pub const STRING: u64 = 9;
        pub const GROUP: u64 = 10;
        pub const MESSAGE: u64 = 11;
        pub const BYTES: u64 = 12;
        pub const UINT32: u64 = 13;
        pub const ENUM: u64 = 14;
        pub const SFIXED32: u64 = 15;
        pub const SFIXED64: u64 = 16;
        pub const SINT32: u64 = 17;
        pub const SINT64: u64 = 18;
    }
}

/// `OneofDescriptorProto`
pub mod oneof {
    pub const NAME: u32 = 1;
    pub const OPTIONS: u32 = 2;
}

/// `EnumDescriptorProto`
pub mod enumeration {
    pub const NAME: u32 = 1;
    pub const VALUE: u32 = 2;
    pub const OPTIONS: u32 = 3;
    pub const RESERVED_RANGE: u32 = 4;
    pub const RESERVED_NAME: u32 = 5;

    /// `EnumDescriptorProto.EnumReservedRange`; `end` is inclusive.
    pub mod range {
        pub const START: u32 = 1;
        pub const END: u32 = 2;
    }
}

/// `EnumValueDescriptorProto`
pub mod enum_value {
    pub const NAME: u32 = 1;
    pub const NUMBER: u32 = 2;
    pub const OPTIONS: u32 = 3;
}

/// `ServiceDescriptorProto`
pub mod service {
    pub const NAME: u32 = 1;
    pub const METHOD: u32 = 2;
    pub const OPTIONS: u32 = 3;
}

/// `MethodDescriptorProto`
pub mod method {
    pub const NAME: u32 = 1;
    pub const INPUT_TYPE: u32 = 2;
    pub const OUTPUT_TYPE: u32 = 3;
    pub const OPTIONS: u32 = 4;
    pub const CLIENT_STREAMING: u32 = 5;
    pub const SERVER_STREAMING: u32 = 6;
}

/// `MessageOptions.map_entry`
pub const MAP_ENTRY_OPTION: u32 = 7;
