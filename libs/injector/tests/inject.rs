use injector::{
    get, inject, inject_path, ConvertError, InjectError, Path, Reflect, StructValue, Struct, Type,
    Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Bird {
    #[inject(rename = "Flying")]
    pub flying: bool,
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Husky {
    #[inject(rename = "IQ")]
    pub iq: u8,
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Dog {
    #[inject(rename = "Husky")]
    pub husky: Husky,
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Animal {
    #[inject(rename = "Id")]
    pub id: u32,
    #[inject(rename = "Name")]
    pub name: String,
    #[inject(rename = "Bird")]
    pub bird: Bird,
    #[inject(rename = "Dog")]
    pub dog: Dog,
    #[inject(rename = "Weight")]
    pub weight: f64,
    #[inject(rename = "Secret")]
    secret: Husky,
    #[inject(skip)]
    pub scratch: Vec<u8>,
}

fn animal() -> Animal {
    Animal {
        id: 10,
        name: "rex".into(),
        bird: Bird { flying: true },
        dog: Dog {
            husky: Husky { iq: 20 },
        },
        ..Animal::default()
    }
}

#[test]
fn integer_into_unsigned_field() {
    init_tracing();
    let mut a = animal();
    inject(&mut a, &["Id"], 666).unwrap();
    assert_eq!(a.id, 666);
}

#[test]
fn bool_into_nested_field() {
    let mut a = animal();
    inject(&mut a, &["Bird", "Flying"], false).unwrap();
    assert!(!a.bird.flying);
}

#[test]
fn text_into_deeply_nested_u8() {
    let mut a = animal();
    inject(&mut a, &["Dog", "Husky", "IQ"], "12").unwrap();
    assert_eq!(a.dog.husky.iq, 12);
}

#[test]
fn number_into_string_field() {
    let mut a = animal();
    inject(&mut a, &["Name"], 600).unwrap();
    assert_eq!(a.name, "600");

    inject(&mut a, &["Name"], 1000.0).unwrap();
    assert_eq!(a.name, "1000");
}

#[test]
fn text_overflow_leaves_field_unchanged() {
    let mut a = animal();
    let err = inject(&mut a, &["Dog", "Husky", "IQ"], "1000").unwrap_err();
    match err {
        InjectError::ConversionFailed {
            required, source, ..
        } => {
            assert_eq!(required, Type::U8);
            assert!(matches!(source, ConvertError::ParseInt { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(a, animal());
}

#[test]
fn non_numeric_text_does_not_become_zero() {
    let mut a = animal();
    assert!(inject(&mut a, &["Id"], "abc").is_err());
    assert_eq!(a.id, 10);
}

#[test]
fn anonymous_struct_into_struct_field() {
    let mut a = animal();
    let value = StructValue::anonymous().field("Husky", StructValue::anonymous().field("IQ", 7u8));
    inject(&mut a, &["Dog"], value).unwrap();
    assert_eq!(a.dog.husky.iq, 7);
}

#[test]
fn struct_with_other_field_types_is_rejected() {
    let mut a = animal();
    let value = StructValue::anonymous().field("Husky", StructValue::anonymous().field("IQ", 7i32));
    let err = inject(&mut a, &["Dog"], value).unwrap_err();
    assert!(matches!(
        err,
        InjectError::ConversionFailed {
            source: ConvertError::NotConvertible { .. },
            ..
        }
    ));
    assert_eq!(a, animal());
}

#[test]
fn derived_struct_value_converts_into_same_shape() {
    let mut a = animal();
    let husky = Husky { iq: 99 };
    inject(&mut a, &["Dog", "Husky"], husky.to_value()).unwrap();
    assert_eq!(a.dog.husky, husky);
}

#[test]
fn empty_path_is_rejected() {
    let mut a = animal();
    let path: [&str; 0] = [];
    assert_eq!(inject(&mut a, &path, 1), Err(InjectError::EmptyPath));
    assert_eq!(a, animal());
}

#[test]
fn unknown_segment_is_named_in_the_error() {
    let mut a = animal();
    assert_eq!(
        inject(&mut a, &["Dog", "Poodle", "IQ"], 1),
        Err(InjectError::FieldNotFound("Poodle".into()))
    );
    // Lookup is case-sensitive.
    assert_eq!(
        inject(&mut a, &["id"], 1),
        Err(InjectError::FieldNotFound("id".into()))
    );
    assert_eq!(a, animal());
}

#[test]
fn skipped_fields_are_not_reachable() {
    let mut a = animal();
    assert_eq!(
        inject(&mut a, &["scratch"], 1),
        Err(InjectError::FieldNotFound("scratch".into()))
    );
}

#[test]
fn scalar_in_the_middle_of_a_path() {
    let mut a = animal();
    assert_eq!(
        inject(&mut a, &["Id", "Low"], 1),
        Err(InjectError::NotStruct("Id".into()))
    );
}

#[test]
fn private_fields_cannot_be_set() {
    let mut a = animal();
    let err = inject(&mut a, &["Secret", "IQ"], 1).unwrap_err();
    assert_eq!(err, InjectError::FieldNotSettable(Path::from("Secret.IQ")));
    assert_eq!(err.to_string(), "fields Secret.IQ cannot be set");
}

#[test]
fn scalar_root_is_an_invalid_target() {
    let mut n = 5u32;
    assert_eq!(
        inject(&mut n, &["x"], 1),
        Err(InjectError::InvalidTarget(Type::U32))
    );
}

#[test]
fn injecting_twice_is_idempotent() {
    let mut once = animal();
    inject(&mut once, &["Dog", "Husky", "IQ"], "42").unwrap();
    let mut twice = animal();
    inject(&mut twice, &["Dog", "Husky", "IQ"], "42").unwrap();
    inject(&mut twice, &["Dog", "Husky", "IQ"], "42").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn text_numeral_round_trips_through_numeric_field() {
    let mut a = animal();
    inject(&mut a, &["Dog", "Husky", "IQ"], "007").unwrap();
    let back = get(&a, &["Dog", "Husky", "IQ"]).unwrap();
    assert_eq!(back, Value::U8(7));
    assert_eq!(back.to_string(), "7");

    inject(&mut a, &["Weight"], "12.50").unwrap();
    assert_eq!(get(&a, &["Weight"]).unwrap().to_string(), "12.5");
}

#[test]
fn get_reads_nested_structs() {
    let a = animal();
    let dog = get(&a, &["Dog"]).unwrap();
    assert_eq!(dog.to_string(), "{Husky:{IQ:20}}");
    assert_eq!(
        get(&a, &["Dog", "Nope"]),
        Err(InjectError::FieldNotFound("Nope".into()))
    );
    // Reading is allowed where writing is not.
    assert_eq!(get(&a, &["Secret", "IQ"]).unwrap(), Value::U8(0));
}

#[test]
fn inject_with_parsed_path() {
    let mut a = animal();
    let path: Path = "Bird.Flying".parse().unwrap();
    inject_path(&mut a, &path, "F").unwrap();
    assert!(!a.bird.flying);
    assert_eq!("".parse::<Path>(), Err(InjectError::EmptyPath));
}

#[test]
fn field_table_is_exposed() {
    let a = animal();
    assert_eq!(a.type_name(), "Animal");
    assert_eq!(
        a.field_names(),
        &["Id", "Name", "Bird", "Dog", "Weight", "Secret"]
    );
    let Type::Struct(shape) = a.reflect_type() else {
        panic!("expected a struct type");
    };
    assert!(shape.field("Id").is_some_and(|f| f.exported));
    assert!(shape.field("Secret").is_some_and(|f| !f.exported));
}
