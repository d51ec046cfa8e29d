// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Round-trip of a three-field tuple through the wire codec.

use mr_wire::{decode, encode, RECORD_HEADER_LEN};

#[test]
fn three_field_tuple_roundtrips_byte_for_byte() {
    let args = (1i32, String::from("hello"), String::from("world"));

    let buf = encode(&args).unwrap();
    // One (slot_id, size) header per record, then 4 + 5 + 5 payload bytes.
    assert_eq!(buf.len(), 3 * RECORD_HEADER_LEN + 4 + 5 + 5);

    let back: (i32, String, String) = decode(&buf).unwrap();
    assert_eq!(back, (1, String::from("hello"), String::from("world")));
}

#[test]
fn tuple_payload_travels_inside_a_message() {
    let mesg = mr_wire::pack_message("left", "right", &(7i32, String::from("hi"))).unwrap();
    let (value, text): (i32, String) = mr_wire::unpack_message(&mesg).unwrap();
    assert_eq!((value, text.as_str()), (7, "hi"));
}
