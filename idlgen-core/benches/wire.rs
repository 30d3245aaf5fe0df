//! Wire reader/writer benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use idlgen_core::{FieldType, MessageHeader, MessageKind, Reader, Writer};
use std::hint::black_box;

fn encode_order(writer: &mut Writer) {
    writer.add_i64(1, 1_700_000_000_000);
    writer.add_i32(2, 42);
    writer.add_string(3, "AAPL");
    writer.open_struct(4);
    writer.add_i64(1, 15050);
    writer.add_i16(2, -2);
    writer.add_stop();
    writer.close_struct();
    writer.add_bool(5, true);
    writer.add_stop();
}

fn benchmark_writer(c: &mut Criterion) {
    c.bench_function("writer_encode_struct", |b| {
        b.iter(|| {
            let mut writer = Writer::with_capacity(64);
            encode_order(black_box(&mut writer));
            black_box(writer.into_bytes())
        })
    });

    let header = MessageHeader::new("place_order", MessageKind::Call, 1);
    c.bench_function("writer_encode_header", |b| {
        b.iter(|| {
            let mut writer = Writer::with_capacity(64);
            black_box(&header).encode(&mut writer);
            black_box(writer.into_bytes())
        })
    });
}

fn benchmark_reader(c: &mut Criterion) {
    let mut writer = Writer::new();
    encode_order(&mut writer);
    let bytes = writer.into_bytes();

    c.bench_function("reader_walk_fields", |b| {
        b.iter(|| {
            let mut reader = Reader::new(black_box(&bytes));
            let mut sum = 0i64;
            while reader.parse_next_field() {
                let field = reader.parsed_field();
                match field.field_type {
                    FieldType::Stop => break,
                    FieldType::I64 => sum += field.value.as_i64(),
                    FieldType::Struct => {
                        reader.skip_field(field);
                    }
                    _ => {}
                }
            }
            black_box(sum)
        })
    });
}

criterion_group!(benches, benchmark_writer, benchmark_reader);
criterion_main!(benches);
