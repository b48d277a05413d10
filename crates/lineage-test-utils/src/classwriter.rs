use std::collections::HashMap;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

const MAJOR_JAVA_17: u16 = 61;

/// Builder for classfile bytes. Names are internal names (`com/example/Foo`), annotations are
/// descriptors (`Lcom/example/Marker;`).
#[derive(Clone, Debug)]
pub struct ClassWriter {
    access_flags: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    visible_annotations: Vec<String>,
    invisible_annotations: Vec<String>,
    fields: Vec<MemberWriter>,
    methods: Vec<MemberWriter>,
}

/// A field or method declaration.
#[derive(Clone, Debug)]
pub struct MemberWriter {
    access_flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    visible_annotations: Vec<String>,
    invisible_annotations: Vec<String>,
    code: Option<Vec<u8>>,
}

impl ClassWriter {
    /// `public class <name> extends java.lang.Object`.
    pub fn class(internal_name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_SUPER,
            this_class: internal_name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            signature: None,
            visible_annotations: Vec::new(),
            invisible_annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// `public interface <name>`; the classfile still records `java/lang/Object` as superclass.
    pub fn interface(internal_name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            ..Self::class(internal_name)
        }
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn super_class(mut self, internal_name: &str) -> Self {
        self.super_class = Some(internal_name.to_string());
        self
    }

    /// Only `java/lang/Object` itself has no superclass.
    pub fn no_super_class(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub fn interface_ref(mut self, internal_name: &str) -> Self {
        self.interfaces.push(internal_name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn annotation(mut self, descriptor: &str) -> Self {
        self.visible_annotations.push(descriptor.to_string());
        self
    }

    pub fn invisible_annotation(mut self, descriptor: &str) -> Self {
        self.invisible_annotations.push(descriptor.to_string());
        self
    }

    pub fn field(mut self, field: MemberWriter) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MemberWriter) -> Self {
        self.methods.push(method);
        self
    }

    pub fn internal_name(&self) -> &str {
        &self.this_class
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();
        let this_index = pool.class(&self.this_class);
        let super_index = self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interface_indices: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut body = Vec::new();
        push_u16(&mut body, self.access_flags);
        push_u16(&mut body, this_index);
        push_u16(&mut body, super_index);
        push_u16(&mut body, interface_indices.len() as u16);
        for idx in interface_indices {
            push_u16(&mut body, idx);
        }
        for members in [&self.fields, &self.methods] {
            push_u16(&mut body, members.len() as u16);
            for member in members.iter() {
                member.write(&mut pool, &mut body);
            }
        }
        write_attributes(
            &mut pool,
            &mut body,
            self.signature.as_deref(),
            &self.visible_annotations,
            &self.invisible_annotations,
            None,
        );

        let mut out = Vec::new();
        push_u32(&mut out, 0xCAFE_BABE);
        push_u16(&mut out, 0);
        push_u16(&mut out, MAJOR_JAVA_17);
        push_u16(&mut out, pool.count());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }
}

impl MemberWriter {
    /// A public member.
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            visible_annotations: Vec::new(),
            invisible_annotations: Vec::new(),
            code: None,
        }
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn annotation(mut self, descriptor: &str) -> Self {
        self.visible_annotations.push(descriptor.to_string());
        self
    }

    pub fn invisible_annotation(mut self, descriptor: &str) -> Self {
        self.invisible_annotations.push(descriptor.to_string());
        self
    }

    /// Attaches an opaque `Code` attribute; readers are expected to skip it.
    pub fn code(mut self, bytes: &[u8]) -> Self {
        self.code = Some(bytes.to_vec());
        self
    }

    fn write(&self, pool: &mut PoolWriter, out: &mut Vec<u8>) {
        push_u16(out, self.access_flags);
        push_u16(out, pool.utf8(&self.name));
        push_u16(out, pool.utf8(&self.descriptor));
        write_attributes(
            pool,
            out,
            self.signature.as_deref(),
            &self.visible_annotations,
            &self.invisible_annotations,
            self.code.as_deref(),
        );
    }
}

fn write_attributes(
    pool: &mut PoolWriter,
    out: &mut Vec<u8>,
    signature: Option<&str>,
    visible: &[String],
    invisible: &[String],
    code: Option<&[u8]>,
) {
    let mut attrs: Vec<(u16, Vec<u8>)> = Vec::new();
    if let Some(code) = code {
        attrs.push((pool.utf8("Code"), code.to_vec()));
    }
    if let Some(sig) = signature {
        let mut body = Vec::new();
        push_u16(&mut body, pool.utf8(sig));
        attrs.push((pool.utf8("Signature"), body));
    }
    for (name, annotations) in [
        ("RuntimeVisibleAnnotations", visible),
        ("RuntimeInvisibleAnnotations", invisible),
    ] {
        if annotations.is_empty() {
            continue;
        }
        let mut body = Vec::new();
        push_u16(&mut body, annotations.len() as u16);
        for desc in annotations {
            push_u16(&mut body, pool.utf8(desc));
            // num_element_value_pairs
            push_u16(&mut body, 0);
        }
        attrs.push((pool.utf8(name), body));
    }

    push_u16(out, attrs.len() as u16);
    for (name_index, body) in attrs {
        push_u16(out, name_index);
        push_u32(out, body.len() as u32);
        out.extend_from_slice(&body);
    }
}

/// Constant pool under construction; entries are deduplicated.
#[derive(Default)]
struct PoolWriter {
    bytes: Vec<u8>,
    next: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolWriter {
    fn allocate(&mut self) -> u16 {
        self.next += 1;
        self.next
    }

    fn count(&self) -> u16 {
        self.next + 1
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(idx) = self.utf8.get(value) {
            return *idx;
        }
        let idx = self.allocate();
        self.bytes.push(1); // CONSTANT_Utf8
        push_u16(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        self.utf8.insert(value.to_string(), idx);
        idx
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(idx) = self.classes.get(internal_name) {
            return *idx;
        }
        let name_index = self.utf8(internal_name);
        let idx = self.allocate();
        self.bytes.push(7); // CONSTANT_Class
        push_u16(&mut self.bytes, name_index);
        self.classes.insert(internal_name.to_string(), idx);
        idx
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
