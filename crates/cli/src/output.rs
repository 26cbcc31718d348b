use ferrous_query_domain::{DnsName, RecordClass, ResourceRecord, ResourceRecords};
use std::io::{self, Write};

/// Prints a dig-like summary followed by every record, one per line.
pub fn print_records<W: Write>(
    out: &mut W,
    name: &DnsName,
    qclass: RecordClass,
    qtype: &str,
    records: &ResourceRecords,
) -> io::Result<()> {
    writeln!(out, ";; QUESTION: {} {} {}", name, qclass, qtype)?;
    writeln!(
        out,
        ";; ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}{}",
        records.answers.len(),
        records.authority.len(),
        records.additional.len(),
        if records.is_zone_transfer() { " (zone transfer)" } else { "" }
    )?;

    print_section(out, "ANSWER", &records.answers)?;
    print_section(out, "AUTHORITY", &records.authority)?;
    print_section(out, "ADDITIONAL", &records.additional)?;
    Ok(())
}

fn print_section<W: Write>(out: &mut W, title: &str, rrs: &[ResourceRecord]) -> io::Result<()> {
    if rrs.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, ";; {} SECTION:", title)?;
    for rr in rrs {
        writeln!(out, "{}", rr)?;
    }
    Ok(())
}
