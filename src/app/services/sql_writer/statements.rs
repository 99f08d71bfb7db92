//! SQL statement builders
//!
//! Each builder produces exactly one statement as a `String`. Values are
//! embedded as quoted literals; [`escape_quotes`] is applied here and
//! nowhere else, so every value is escaped exactly once no matter how it
//! reached the builder.
//!
//! Rows that belong to the most recently inserted sample or point reference
//! it through `currval` on the owning table's id sequence, which is why
//! statement order matters and the emitter never reorders fragments.

use chrono::{NaiveDate, NaiveTime};

/// Double any single quote so the value can sit inside a quoted literal
pub fn escape_quotes(value: &str) -> String {
    value.replace('\'', "''")
}

/// Echo the raw source line so failures in a psql session are easy to place
pub fn select_line(raw: &str) -> String {
    format!("SELECT '{}' as line;", escape_quotes(raw))
}

/// Reference to the sample inserted most recently in this session
pub fn current_sample() -> &'static str {
    "(SELECT currval('samples_sid_seq'::regclass))"
}

/// Reference to the point inserted most recently in this session
pub fn current_point() -> &'static str {
    "(SELECT currval('point_data_pntid_seq'::regclass))"
}

/// Insert one row into babase.samples
#[allow(clippy::too_many_arguments)]
pub fn insert_sample(
    date: NaiveDate,
    stime: NaiveTime,
    observer: &str,
    stype: &str,
    group: &str,
    sname: &str,
    mins: usize,
    program_id: &str,
    setup_id: &str,
    tablet: &str,
) -> String {
    format!(
        "INSERT INTO babase.samples (date, stime, observer, stype, grp, sname, mins, programid, setupid, collection_system) \
         VALUES ('{date}', '{stime}', '{observer}', '{stype}', \
         (SELECT gid FROM babase.groups WHERE three_letter_code = '{group}'), \
         '{sname}', {mins}, \
         (SELECT programid FROM babase.programids WHERE pid_string = '{program}'), \
         (SELECT setupid FROM babase.setupids WHERE sid_string = '{setup}'), \
         (SELECT collection_system FROM babase.samples_collection_systems WHERE descr = '{tablet}'));",
        date = date,
        stime = stime,
        observer = escape_quotes(observer),
        stype = escape_quotes(stype),
        group = escape_quotes(group),
        sname = escape_quotes(sname),
        mins = mins,
        program = escape_quotes(program_id),
        setup = escape_quotes(setup_id),
        tablet = escape_quotes(tablet),
    )
}

/// Insert one row into babase.point_data, owned by the current sample
pub fn insert_point(
    minute: usize,
    time: NaiveTime,
    activity: &str,
    posture: &str,
    foodcode: Option<&str>,
) -> String {
    match foodcode {
        Some(foodcode) => format!(
            "INSERT INTO babase.point_data (sid, min, activity, posture, ptime, foodcode) \
             VALUES ({sid}, {minute}, '{activity}', '{posture}', '{time}', '{foodcode}');",
            sid = current_sample(),
            minute = minute,
            activity = escape_quotes(activity),
            posture = escape_quotes(posture),
            time = time,
            foodcode = escape_quotes(foodcode),
        ),
        None => format!(
            "INSERT INTO babase.point_data (sid, min, activity, posture, ptime) \
             VALUES ({sid}, {minute}, '{activity}', '{posture}', '{time}');",
            sid = current_sample(),
            minute = minute,
            activity = escape_quotes(activity),
            posture = escape_quotes(posture),
            time = time,
        ),
    }
}

/// Insert one row into babase.fpoints, the adult-female extension of the
/// current point
pub fn insert_fpoint(kidcontact: char, kidsuckle: char) -> String {
    format!(
        "INSERT INTO babase.fpoints (pntid, kidcontact, kidsuckle) \
         VALUES ({pntid}, '{kidcontact}', '{kidsuckle}');",
        pntid = current_point(),
        kidcontact = kidcontact,
        kidsuckle = kidsuckle,
    )
}

/// Insert one row into babase.neighbors with a known sname
pub fn insert_neighbor(sname: &str, ncode: &str) -> String {
    format!(
        "INSERT INTO babase.neighbors (pntid, ncode, sname) \
         VALUES ({pntid}, '{ncode}', '{sname}');",
        pntid = current_point(),
        ncode = escape_quotes(ncode),
        sname = escape_quotes(sname),
    )
}

/// Insert one row into babase.neighbors with an unknown-individual code
pub fn insert_unknown_neighbor(unksname: &str, ncode: &str) -> String {
    format!(
        "INSERT INTO babase.neighbors (pntid, ncode, unksname) \
         VALUES ({pntid}, '{ncode}', '{unksname}');",
        pntid = current_point(),
        ncode = escape_quotes(ncode),
        unksname = escape_quotes(unksname),
    )
}

/// Insert an interaction that happened during the current focal sample
pub fn insert_interaction_in_focal(
    observer: &str,
    date: NaiveDate,
    time: NaiveTime,
    actor: &str,
    act: &str,
    actee: &str,
) -> String {
    format!(
        "INSERT INTO babase.actor_actees (sid, observer, date, start, stop, actor, act, actee, handwritten) \
         VALUES ({sid}, '{observer}', '{date}', '{time}', '{time}', '{actor}', '{act}', '{actee}', FALSE);",
        sid = current_sample(),
        observer = escape_quotes(observer),
        date = date,
        time = time,
        actor = escape_quotes(actor),
        act = escape_quotes(act),
        actee = escape_quotes(actee),
    )
}

/// Insert an interaction recorded outside any focal sample.
///
/// Without an owning sample there are no start and stop times; the date
/// carries the when.
pub fn insert_interaction_standalone(
    observer: &str,
    date: NaiveDate,
    actor: &str,
    act: &str,
    actee: &str,
) -> String {
    format!(
        "INSERT INTO babase.actor_actees (observer, date, actor, act, actee, handwritten) \
         VALUES ('{observer}', '{date}', '{actor}', '{act}', '{actee}', FALSE);",
        observer = escape_quotes(observer),
        date = date,
        actor = escape_quotes(actor),
        act = escape_quotes(act),
        actee = escape_quotes(actee),
    )
}

/// Insert one row into babase.allmiscs, owned by the current sample.
///
/// The text is uppercased and prefixed with the note class before escaping.
pub fn insert_allmisc(time: NaiveTime, prefix: &str, text: &str) -> String {
    let txt = format!("{},{}", prefix, text.to_uppercase());
    format!(
        "INSERT INTO babase.allmiscs (sid, atime, txt) \
         VALUES ({sid}, '{time}', '{txt}');",
        sid = current_sample(),
        time = time,
        txt = escape_quotes(&txt),
    )
}
