//! Diesel schema for execution and task persistence.

diesel::table! {
    /// Execution records, one per logical job request.
    executions (id) {
        /// Store-assigned execution identifier.
        id -> Int8,
        /// Job kind owning the execution.
        #[max_length = 64]
        vendor_type -> Varchar,
        /// Owner identifier.
        vendor_id -> Int8,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Status detail.
        status_message -> Text,
        /// Trigger.
        #[max_length = 32]
        trigger -> Varchar,
        /// Extra attributes payload.
        extra_attrs -> Jsonb,
        /// Start timestamp.
        start_time -> Timestamptz,
        /// End timestamp.
        end_time -> Nullable<Timestamptz>,
        /// Last update timestamp.
        update_time -> Timestamptz,
    }
}

diesel::table! {
    /// Task records handed to the job runner.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Owning execution.
        execution_id -> Int8,
        /// Job kind owning the task.
        #[max_length = 64]
        vendor_type -> Varchar,
        /// Scheduling kind.
        #[max_length = 32]
        job_kind -> Varchar,
        /// Runner parameters.
        parameters -> Jsonb,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Status detail.
        status_message -> Text,
        /// Creation timestamp.
        creation_time -> Timestamptz,
        /// End timestamp.
        end_time -> Nullable<Timestamptz>,
        /// Last update timestamp.
        update_time -> Timestamptz,
    }
}

diesel::joinable!(tasks -> executions (execution_id));
diesel::allow_tables_to_appear_in_same_query!(executions, tasks);
