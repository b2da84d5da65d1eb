//! Output formatting for CSV, JSON, and text table formats.

use crate::compute::{CheckResult, PositionRecord, RecordStream};
use crate::data::{OutputFormat, Parameters};
use crate::error::OutputError;
use crate::planner::OutputPlan;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

const TABLE_MIN_WIDTH: usize = 14;

/// Angle rendering shared by all formats.
#[derive(Debug, Clone, Copy)]
struct Angles {
    radians: bool,
}

impl Angles {
    fn value(&self, degrees: f64) -> f64 {
        if self.radians {
            degrees.to_radians()
        } else {
            degrees
        }
    }

    fn text(&self, degrees: f64) -> String {
        if self.radians {
            format!("{:.7} rad", degrees.to_radians())
        } else {
            format!("{:.5}°", degrees)
        }
    }

    fn csv(&self, degrees: f64) -> String {
        if self.radians {
            format!("{:.7}", degrees.to_radians())
        } else {
            format!("{:.5}", degrees)
        }
    }
}

pub fn dispatch_output<W: Write>(
    results: RecordStream,
    params: &Parameters,
    plan: &OutputPlan,
    writer: &mut W,
) -> Result<usize, OutputError> {
    let angles = Angles {
        radians: params.output.radians,
    };
    let compare = params.compare;

    let count = match params.output.format {
        OutputFormat::Csv => {
            write_csv_positions(results, plan.show_inputs, params.output.headers, compare, angles, writer)?
        }
        OutputFormat::Json => write_json_positions(results, plan.show_inputs, angles, writer)?,
        OutputFormat::Text if plan.varies.0 || plan.varies.1 => {
            write_streaming_text_table(results, plan, compare, angles, writer)?
        }
        OutputFormat::Text => write_text_positions(results, plan.show_inputs, angles, writer)?,
    };

    writer.flush()?;
    Ok(count)
}

fn write_csv_positions<W: Write>(
    results: RecordStream,
    show_inputs: bool,
    headers: bool,
    compare: bool,
    angles: Angles,
    writer: &mut W,
) -> Result<usize, OutputError> {
    if headers {
        let mut columns = Vec::new();
        if show_inputs {
            columns.extend(["latitude", "longitude"]);
        }
        columns.extend(["dateTime", "azimuth", "altitude"]);
        if compare {
            columns.extend([
                "deltaT",
                "refAzimuth",
                "refAltitude",
                "azimuthError",
                "altitudeError",
            ]);
        }
        writeln!(writer, "{}", columns.join(","))?;
    }

    let mut count = 0;
    for record in results {
        let record = record?;
        let mut fields = Vec::new();
        if show_inputs {
            fields.push(format!("{:.5}", record.lat));
            fields.push(format!("{:.5}", record.lon));
        }
        fields.push(record.datetime.to_rfc3339());
        fields.push(angles.csv(record.position.azimuth_degrees()));
        fields.push(angles.csv(record.position.altitude_degrees()));
        if let Some(cmp) = &record.comparison {
            fields.push(format!("{:.3}", cmp.delta_t));
            fields.push(angles.csv(cmp.reference.azimuth_degrees()));
            fields.push(angles.csv(cmp.reference.altitude_degrees()));
            fields.push(format!("{:.5}", cmp.azimuth_error));
            fields.push(format!("{:.5}", cmp.altitude_error));
        }
        writeln!(writer, "{}", fields.join(","))?;
        count += 1;
    }
    Ok(count)
}

fn format_json_position(record: &PositionRecord, show_inputs: bool, angles: Angles) -> String {
    let mut json = String::from("{");
    if show_inputs {
        json.push_str(&format!(
            r#""latitude":{},"longitude":{},"#,
            record.lat, record.lon
        ));
    }
    json.push_str(&format!(
        r#""dateTime":"{}","azimuth":{},"altitude":{}"#,
        record.datetime.to_rfc3339(),
        angles.value(record.position.azimuth_degrees()),
        angles.value(record.position.altitude_degrees())
    ));
    if let Some(cmp) = &record.comparison {
        json.push_str(&format!(
            r#","deltaT":{},"refAzimuth":{},"refAltitude":{},"azimuthError":{},"altitudeError":{}"#,
            cmp.delta_t,
            angles.value(cmp.reference.azimuth_degrees()),
            angles.value(cmp.reference.altitude_degrees()),
            cmp.azimuth_error,
            cmp.altitude_error
        ));
    }
    json.push('}');
    json
}

fn write_json_positions<W: Write>(
    results: RecordStream,
    show_inputs: bool,
    angles: Angles,
    writer: &mut W,
) -> Result<usize, OutputError> {
    let mut count = 0;
    for record in results {
        writeln!(writer, "{}", format_json_position(&record?, show_inputs, angles))?;
        count += 1;
    }
    Ok(count)
}

fn format_text_position(record: &PositionRecord, show_inputs: bool, angles: Angles) -> String {
    let mut lines = Vec::new();

    if show_inputs {
        lines.push(format!("│ Location   {}, {}", record.lat, record.lon));
    }
    lines.push(format!(
        "│ DateTime   {}",
        record.datetime.format("%Y-%m-%d %H:%M:%S%.3f%:z")
    ));
    lines.push(format!(
        "│ Azimuth    {}",
        angles.text(record.position.azimuth_degrees())
    ));
    lines.push(format!(
        "│ Altitude   {}",
        angles.text(record.position.altitude_degrees())
    ));

    if let Some(cmp) = &record.comparison {
        lines.push(format!("│ Delta T    {:.1} s", cmp.delta_t));
        lines.push(format!(
            "│ SPA        {} / {}",
            angles.text(cmp.reference.azimuth_degrees()),
            angles.text(cmp.reference.altitude_degrees())
        ));
        lines.push(format!(
            "│ Error      {:.5}° / {:+.5}°",
            cmp.azimuth_error, cmp.altitude_error
        ));
    }

    let box_width = lines.iter().map(|line| line.width()).max().unwrap_or(0) + 1;

    let mut output = String::new();
    output.push_str(&format!("┌{}\n", "─".repeat(box_width)));
    for line in lines {
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str(&format!("└{}\n", "─".repeat(box_width)));
    output
}

fn write_text_positions<W: Write>(
    results: RecordStream,
    show_inputs: bool,
    angles: Angles,
    writer: &mut W,
) -> Result<usize, OutputError> {
    let mut count = 0;
    for record in results {
        write!(writer, "{}", format_text_position(&record?, show_inputs, angles))?;
        count += 1;
    }
    Ok(count)
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    let mut row = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.width());
        row.push_str(&format!(" {}{} │", " ".repeat(pad), cell));
    }
    row.push('\n');
    row
}

fn write_streaming_text_table<W: Write>(
    mut results: RecordStream,
    plan: &OutputPlan,
    compare: bool,
    angles: Angles,
    writer: &mut W,
) -> Result<usize, OutputError> {
    let Some(first) = results.next().transpose()? else {
        return Ok(0);
    };

    let (lat_varies, lon_varies) = plan.varies;

    if !lat_varies {
        writeln!(writer, "  Latitude:    {:.6}°", first.lat)?;
    }
    if !lon_varies {
        writeln!(writer, "  Longitude:   {:.6}°", first.lon)?;
    }
    writeln!(
        writer,
        "  DateTime:    {}",
        first.datetime.format("%Y-%m-%d %H:%M:%S%.3f%:z")
    )?;
    if let Some(cmp) = &first.comparison {
        writeln!(writer, "  Delta T:     {:.1} s", cmp.delta_t)?;
    }
    writeln!(writer)?;

    let mut headers = Vec::new();
    if lat_varies {
        headers.push("Latitude");
    }
    if lon_varies {
        headers.push("Longitude");
    }
    headers.extend(["Azimuth", "Altitude"]);
    if compare {
        headers.extend(["SPA Azimuth", "SPA Altitude", "Az Error", "Alt Error"]);
    }

    let widths: Vec<usize> = headers
        .iter()
        .map(|h| h.width().max(TABLE_MIN_WIDTH))
        .collect();

    let cells = |record: &PositionRecord| -> Vec<String> {
        let mut cells = Vec::new();
        if lat_varies {
            cells.push(format!("{:.5}°", record.lat));
        }
        if lon_varies {
            cells.push(format!("{:.5}°", record.lon));
        }
        cells.push(angles.text(record.position.azimuth_degrees()));
        cells.push(angles.text(record.position.altitude_degrees()));
        if let Some(cmp) = &record.comparison {
            cells.push(angles.text(cmp.reference.azimuth_degrees()));
            cells.push(angles.text(cmp.reference.altitude_degrees()));
            cells.push(format!("{:.5}°", cmp.azimuth_error));
            cells.push(format!("{:+.5}°", cmp.altitude_error));
        }
        cells
    };

    write!(writer, "{}", border(&widths, '┌', '┬', '┐'))?;
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write!(writer, "{}", table_row(&header_cells, &widths))?;
    write!(writer, "{}", border(&widths, '├', '┼', '┤'))?;

    write!(writer, "{}", table_row(&cells(&first), &widths))?;
    let mut count = 1;
    for record in results {
        write!(writer, "{}", table_row(&cells(&record?), &widths))?;
        count += 1;
    }

    write!(writer, "{}", border(&widths, '└', '┴', '┘'))?;
    Ok(count)
}

pub fn write_check_report<W: Write>(
    result: &CheckResult,
    params: &Parameters,
    writer: &mut W,
) -> io::Result<()> {
    let report = &result.report;
    let delta_t = result
        .delta_t
        .map(|dt| format!("{}", dt))
        .unwrap_or_else(|| "estimated".to_string());

    match params.output.format {
        OutputFormat::Text => {
            writeln!(writer, "  Samples:     {}", report.samples)?;
            writeln!(writer, "  Seed:        {}", result.seed)?;
            writeln!(
                writer,
                "  Window:      {} to {}",
                result.window.start(),
                result.window.end()
            )?;
            writeln!(writer, "  Delta T:     {}", delta_t)?;
            writeln!(writer)?;
            writeln!(writer, "Test results:")?;
            writeln!(writer, "avg_azimuth_error: {:.4}", report.mean_azimuth_error)?;
            // Signed mean, as the harness has always reported it
            writeln!(writer, "avg_altitude_error: {:.4}", report.altitude_bias)?;
            writeln!(writer, "max_azimuth_error: {:.4}", report.max_azimuth_error)?;
            writeln!(writer, "max_altitude_error: {:.4}", report.max_altitude_error)?;
            writeln!(
                writer,
                "avg_abs_altitude_error: {:.4}",
                report.mean_altitude_error
            )?;
        }
        OutputFormat::Csv => {
            if params.output.headers {
                writeln!(
                    writer,
                    "samples,seed,from,to,deltaT,avgAzimuthError,avgAltitudeError,avgAbsAltitudeError,maxAzimuthError,maxAltitudeError"
                )?;
            }
            writeln!(
                writer,
                "{},{},{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6}",
                report.samples,
                result.seed,
                result.window.start(),
                result.window.end(),
                delta_t,
                report.mean_azimuth_error,
                report.altitude_bias,
                report.mean_altitude_error,
                report.max_azimuth_error,
                report.max_altitude_error
            )?;
        }
        OutputFormat::Json => {
            let delta_t_json = result
                .delta_t
                .map(|dt| format!("{}", dt))
                .unwrap_or_else(|| "null".to_string());
            writeln!(
                writer,
                r#"{{"samples":{},"seed":{},"from":"{}","to":"{}","deltaT":{},"avgAzimuthError":{},"avgAltitudeError":{},"avgAbsAltitudeError":{},"maxAzimuthError":{},"maxAltitudeError":{}}}"#,
                report.samples,
                result.seed,
                result.window.start(),
                result.window.end(),
                delta_t_json,
                report.mean_azimuth_error,
                report.altitude_bias,
                report.mean_altitude_error,
                report.max_azimuth_error,
                report.max_altitude_error
            )?;
        }
    }
    writer.flush()
}
