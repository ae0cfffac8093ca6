diesel::table! {
    bed_bookings (id) {
        id -> Integer,
        hospital_id -> Integer,
        patient_name -> Text,
        age -> Integer,
        gender -> Text,
        phone -> Text,
        bed_number -> Integer,
        reason -> Text,
        status -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    hospitals (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        password -> Text,
        max_queue_size -> Integer,
        max_beds -> Integer,
        next_queue_number -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    opd_queue (id) {
        id -> Integer,
        hospital_id -> Integer,
        patient_name -> Text,
        age -> Integer,
        gender -> Text,
        phone -> Text,
        symptoms -> Text,
        queue_number -> Integer,
        status -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(bed_bookings -> hospitals (hospital_id));
diesel::joinable!(opd_queue -> hospitals (hospital_id));

diesel::allow_tables_to_appear_in_same_query!(bed_bookings, hospitals, opd_queue,);
